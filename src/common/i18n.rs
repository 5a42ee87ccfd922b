// src/common/i18n.rs

use std::collections::HashMap;

const DEFAULT_LANG: &str = "en";

// Mensagens embutidas no binário: não dependem do diretório de execução.
const LOCALES: [(&str, &str); 2] = [
    ("en", include_str!("../../locales/en.json")),
    ("pt", include_str!("../../locales/pt.json")),
];

/// Catálogo de mensagens por idioma ("en", "pt", ...).
#[derive(Debug, Clone, Default)]
pub struct I18nStore {
    messages: HashMap<String, HashMap<String, String>>,
}

impl I18nStore {
    pub fn load() -> anyhow::Result<Self> {
        let mut messages = HashMap::new();
        for (lang, raw) in LOCALES {
            let table: HashMap<String, String> = serde_json::from_str(raw)
                .map_err(|e| anyhow::anyhow!("Arquivo de idioma '{}' inválido: {}", lang, e))?;
            messages.insert(lang.to_string(), table);
        }
        Ok(Self { messages })
    }

    /// Traduz `key` e substitui os marcadores `{nome}` pelos parâmetros.
    /// Idioma desconhecido cai para inglês; chave desconhecida devolve a própria chave.
    pub fn translate(&self, lang: &str, key: &str, params: &[(&str, String)]) -> String {
        let template = self
            .messages
            .get(lang)
            .and_then(|table| table.get(key))
            .or_else(|| self.messages.get(DEFAULT_LANG).and_then(|table| table.get(key)));

        let Some(template) = template else {
            return key.to_string();
        };

        params.iter().fold(template.clone(), |acc, (name, value)| {
            acc.replace(&format!("{{{}}}", name), value)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translates_with_parameters() {
        let i18n = I18nStore::load().unwrap();
        let msg = i18n.translate("pt", "errors.not_found", &[("resource", "Pedido ORD-1".into())]);
        assert!(msg.contains("Pedido ORD-1"));
    }

    #[test]
    fn unknown_language_falls_back_to_english() {
        let i18n = I18nStore::load().unwrap();
        assert_eq!(
            i18n.translate("de", "errors.internal", &[]),
            i18n.translate("en", "errors.internal", &[])
        );
    }

    #[test]
    fn unknown_key_is_returned_verbatim() {
        let i18n = I18nStore::load().unwrap();
        assert_eq!(i18n.translate("en", "errors.nope", &[]), "errors.nope");
    }
}
