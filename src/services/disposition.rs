// src/services/disposition.rs
//
// Motor de regras de RMA: escolhe o destino de um item devolvido e aprovado.

use crate::{
    common::error::AppError,
    models::{
        returns::{DispositionAction, ItemCondition, ReturnAuthorization, ReturnReason, ReturnStatus},
        settings::RmaRules,
    },
};

/// Aplica as regras em ordem; a primeira que casar decide:
/// 1. danificado sem conserto, ou mais velho que `scrap_after_days` => Scrap
/// 2. defeituoso (reparável) => Repair
/// 3. item errado => Replace
/// 4. perfeito e dentro da janela de reposição => Restock
/// 5. demais casos => Repair (recondicionar antes de revender)
pub fn select_disposition(
    rma: &ReturnAuthorization,
    rules: &RmaRules,
) -> Result<DispositionAction, AppError> {
    ensure_approved(rma)?;

    let condition = rma.condition.ok_or_else(|| {
        AppError::field("condition", "required", "A devolução precisa ser inspecionada antes.")
    })?;

    Ok(decide(condition, rma.reason, rma.age_in_days(), rules))
}

/// Toda ação de destino (automática ou manual) exige a devolução aprovada.
pub fn ensure_approved(rma: &ReturnAuthorization) -> Result<(), AppError> {
    if rma.status != ReturnStatus::Approved {
        return Err(AppError::InvalidTransition {
            entity: "return",
            from: rma.status.to_string(),
            to: "disposition".to_string(),
        });
    }
    Ok(())
}

fn decide(condition: ItemCondition, reason: ReturnReason, age_days: i64, rules: &RmaRules) -> DispositionAction {
    if condition == ItemCondition::DamagedBeyondRepair || age_days > rules.scrap_after_days {
        return DispositionAction::Scrap;
    }
    if condition == ItemCondition::Defective {
        return DispositionAction::Repair;
    }
    if reason == ReturnReason::WrongItem {
        return DispositionAction::Replace;
    }
    if condition == ItemCondition::Perfect && age_days <= rules.restock_window_days {
        return DispositionAction::Restock;
    }
    DispositionAction::Repair
}
