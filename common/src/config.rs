use crate::host::normalize_org_key;

/// Settings for a single discovery run.
#[derive(Clone, Debug)]
pub struct Config {
    /// Root domain the run is scoped to.
    pub domain: String,

    /// Organisation name, used for dataset lookups and the output
    /// directory. Defaults to the domain when not given.
    pub org: String,

    /// Enables the remote dataset (Chaos) lookup as the first pass.
    pub chaos: bool,
}

impl Config {
    pub fn new(domain: String, org: Option<String>, chaos: bool) -> Self {
        let org = org.unwrap_or_else(|| domain.clone());
        Self { domain, org, chaos }
    }

    /// Filesystem-safe key derived from the organisation name.
    pub fn org_key(&self) -> String {
        normalize_org_key(&self.org)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn org_defaults_to_domain() {
        let cfg = Config::new("example.com".into(), None, false);
        assert_eq!(cfg.org, "example.com");
        assert_eq!(cfg.org_key(), "example.com");
    }

    #[test]
    fn org_key_normalizes_spaces() {
        let cfg = Config::new("example.com".into(), Some("Acme Corp".into()), true);
        assert_eq!(cfg.org_key(), "acme_corp");
    }
}
