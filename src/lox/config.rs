use std::env;

pub const EMIT_VAR: &str = "RLOX_EMIT";
pub const LEGACY_OR_VAR: &str = "RLOX_LEGACY_OR";

/// What the driver does with a unit once it has parsed cleanly
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Emit {
    /// print the token stream and stop after scanning
    Tokens,
    /// print every statement in prefix form
    Ast,
    #[default]
    Eval,
}

impl Emit {
    fn parse(val: &str) -> Option<Self> {
        match val.trim().to_ascii_lowercase().as_str() {
            "tokens" => Some(Emit::Tokens),
            "ast" => Some(Emit::Ast),
            "eval" => Some(Emit::Eval),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Config {
    pub emit: Emit,
    /// scan `or` through the old single-character special case instead of the keyword table
    pub legacy_or: bool,
}

impl Config {
    /// Reads `RLOX_EMIT` and `RLOX_LEGACY_OR`. Missing or unrecognised values keep the defaults
    pub fn from_env() -> Self {
        Self::from_vars(
            env::var(EMIT_VAR).ok().as_deref(),
            env::var(LEGACY_OR_VAR).ok().as_deref(),
        )
    }

    fn from_vars(emit: Option<&str>, legacy_or: Option<&str>) -> Self {
        Self {
            emit: emit.and_then(Emit::parse).unwrap_or_default(),
            legacy_or: legacy_or.map(is_truthy_flag).unwrap_or(false),
        }
    }
}

fn is_truthy_flag(val: &str) -> bool {
    matches!(
        val.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
