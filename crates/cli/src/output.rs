use anyhow::Result;
use serde::Serialize;

/// Console printer for section banners and JSON results.
#[derive(Debug, Clone, Copy)]
pub struct Output {
    compact: bool,
}

impl Output {
    pub fn new(compact: bool) -> Self {
        Self { compact }
    }

    /// `***name***` banner, separated from the previous section by a blank line.
    pub fn section(&self, name: &str, first: bool) {
        if !first {
            println!();
        }
        println!("{}", banner(name));
    }

    pub fn label(&self, name: &str) {
        println!("-- {} --", name);
    }

    pub fn json<T: Serialize + ?Sized>(&self, value: &T) -> Result<()> {
        println!("{}", self.render(value)?);
        Ok(())
    }

    fn render<T: Serialize + ?Sized>(&self, value: &T) -> Result<String> {
        let text = if self.compact {
            serde_json::to_string(value)?
        } else {
            serde_json::to_string_pretty(value)?
        };
        Ok(text)
    }
}

fn banner(name: &str) -> String {
    format!("***{}***", name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_banner() {
        assert_eq!(banner("create"), "***create***");
    }

    #[test]
    fn test_render_pretty_and_compact() {
        let value = json!({"id": "inventory:1", "total": 1});
        let pretty = Output::new(false).render(&value).unwrap();
        assert!(pretty.contains('\n'));
        let compact = Output::new(true).render(&value).unwrap();
        assert_eq!(compact, r#"{"id":"inventory:1","total":1}"#);
    }
}
