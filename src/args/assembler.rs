//! Argument assembler: everything forwarded to the launched command.

/// Launcher-owned flag selecting the command to run. Never forwarded.
pub const CMD_FLAG: &str = "--cmd";
/// Model flag injected from the profile.
pub const MODEL_FLAG: &str = "--model";

/// Builder for CLI arguments passed to the launched process.
#[derive(Debug, Clone, Default)]
pub struct ArgAssembler {
    args: Vec<String>,
    command_override: Option<String>,
    warnings: Vec<String>,
}

impl ArgAssembler {
    /// Start with an empty arg list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from forwarded args, consuming any `--cmd <binary>` /
    /// `--cmd=<binary>` pair. The last occurrence wins.
    pub fn from_forwarded(raw_args: &[String]) -> Self {
        let mut assembler = Self::new();
        let mut iter = raw_args.iter();

        while let Some(arg) = iter.next() {
            if arg == CMD_FLAG {
                match iter.next() {
                    Some(value) => assembler.command_override = Some(value.clone()),
                    None => assembler
                        .warnings
                        .push(format!("{}: missing required value", CMD_FLAG)),
                }
            } else if let Some(value) = arg.strip_prefix("--cmd=") {
                assembler.command_override = Some(value.to_string());
            } else {
                assembler.args.push(arg.clone());
            }
        }
        assembler
    }

    /// Prepend `--model <model>` unless the caller already chose a model.
    pub fn with_model(mut self, model: Option<&str>) -> Self {
        if let Some(model) = model {
            if !has_model_flag(&self.args) {
                self.args
                    .splice(0..0, [MODEL_FLAG.to_string(), model.to_string()]);
            }
        }
        self
    }

    /// Command named by a forwarded `--cmd`, if any.
    pub fn command_override(&self) -> Option<&str> {
        self.command_override.as_deref()
    }

    /// Warnings produced while consuming launcher flags.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Build the final argument list.
    pub fn build(self) -> Vec<String> {
        self.args
    }
}

/// Whether `args` already select a model (`--model x` or `--model=x`).
pub fn has_model_flag(args: &[String]) -> bool {
    args.iter()
        .any(|a| a == MODEL_FLAG || a.starts_with("--model="))
}
