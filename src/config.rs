//! Runtime configuration

/// File-kind marker annotated when nothing else is specified
const DEFAULT_FILE_KIND: &str = ".hs";

/// Runtime configuration for one run
#[derive(Debug, Clone)]
pub struct Config {
    /// File-kind marker of the containers to annotate
    pub file_kind: String,
    /// Render `->` arrows as `⟶` in tooltip text
    pub fancy_arrows: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self::resolve(None)
    }
}

impl Config {
    /// CLI flag beats the TYPELENS_FILE_KIND environment override,
    /// which beats the default. TYPELENS_PLAIN_ARROWS disables the
    /// fancy arrow rendering.
    pub fn resolve(cli_file_kind: Option<String>) -> Self {
        let env_file_kind = std::env::var("TYPELENS_FILE_KIND").ok();
        let plain_arrows = std::env::var("TYPELENS_PLAIN_ARROWS").ok();
        Self {
            file_kind: pick_file_kind(cli_file_kind, env_file_kind),
            fancy_arrows: pick_fancy_arrows(plain_arrows),
        }
    }
}

fn pick_file_kind(cli: Option<String>, env: Option<String>) -> String {
    cli.or(env)
        .filter(|k| !k.is_empty())
        .unwrap_or_else(|| DEFAULT_FILE_KIND.to_string())
}

fn pick_fancy_arrows(plain_arrows: Option<String>) -> bool {
    match plain_arrows.map(|v| v.to_lowercase()).as_deref() {
        Some("1") | Some("true") | Some("yes") => false,
        _ => true,
    }
}
