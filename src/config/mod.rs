//! # Transpiler configuration
//!
//! Knobs that shape the emitted Python. None of them change what a script
//! means; they only decide how the generated procedure is spelled.

/// Settings for [`crate::interpreter::Interpreter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Spaces per indentation level in emitted code.
    pub indent_width: usize,
    /// Name of the object `EXECUTE IMMEDIATE` calls `execute` on.
    pub connection: String,
    /// Name of the object caught errors are reported through.
    pub logger: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            indent_width: 4,
            connection: "connection".to_string(),
            logger: "logging".to_string(),
        }
    }
}

impl Config {
    pub fn with_indent_width(mut self, width: usize) -> Self {
        self.indent_width = width;
        self
    }

    pub fn with_connection(mut self, name: impl Into<String>) -> Self {
        self.connection = name.into();
        self
    }

    pub fn with_logger(mut self, name: impl Into<String>) -> Self {
        self.logger = name.into();
        self
    }

    /// Leading whitespace for the given nesting depth.
    pub fn indent(&self, depth: usize) -> String {
        " ".repeat(self.indent_width * depth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.indent(2), "        ");
        assert_eq!(config.connection, "connection");
        assert_eq!(config.logger, "logging");
    }

    #[test]
    fn builders_override_fields() {
        let config = Config::default()
            .with_indent_width(2)
            .with_connection("conn")
            .with_logger("log");
        assert_eq!(config.indent(1), "  ");
        assert_eq!(config.connection, "conn");
        assert_eq!(config.logger, "log");
    }
}
