use std::fmt;

const UNKNOWN: &str = "unknown";

/// Build metadata embedded at compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildInfo {
    pub version: &'static str,
    pub git_hash: &'static str,
    pub git_status: &'static str,
    pub timestamp: &'static str,
    pub target: &'static str,
    pub profile: &'static str,
    pub rustc: &'static str,
}

pub fn current() -> BuildInfo {
    BuildInfo {
        version: env!("CARGO_PKG_VERSION"),
        git_hash: option_env!("FINTRACK_BUILD_HASH").unwrap_or(UNKNOWN),
        git_status: option_env!("FINTRACK_BUILD_STATUS").unwrap_or(UNKNOWN),
        timestamp: option_env!("FINTRACK_BUILD_TIMESTAMP").unwrap_or(UNKNOWN),
        target: option_env!("FINTRACK_BUILD_TARGET").unwrap_or(UNKNOWN),
        profile: option_env!("FINTRACK_BUILD_PROFILE").unwrap_or(UNKNOWN),
        rustc: option_env!("FINTRACK_BUILD_RUSTC").unwrap_or(UNKNOWN),
    }
}

impl fmt::Display for BuildInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "fintrack {}", self.version)?;
        writeln!(f, "commit:   {} ({})", self.git_hash, self.git_status)?;
        writeln!(f, "built:    {}", self.timestamp)?;
        writeln!(f, "target:   {} [{}]", self.target, self.profile)?;
        write!(f, "compiler: {}", self.rustc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_matches_package() {
        let info = current();
        assert_eq!(info.version, env!("CARGO_PKG_VERSION"));
        assert!(info.to_string().starts_with("fintrack "));
    }
}
