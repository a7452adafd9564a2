/// Compile-time build metadata produced by `build.rs`.
#[derive(Debug, Clone, Copy)]
pub struct BuildMetadata {
    pub version: &'static str,
    pub git_hash: &'static str,
    pub timestamp: &'static str,
    pub profile: &'static str,
}

impl BuildMetadata {
    pub fn describe(&self) -> String {
        format!(
            "converter_core {} ({}, {} build, {})",
            self.version, self.git_hash, self.profile, self.timestamp
        )
    }
}

pub fn current() -> BuildMetadata {
    BuildMetadata {
        version: env!("CARGO_PKG_VERSION"),
        git_hash: option_env!("CONVERTER_CORE_BUILD_HASH").unwrap_or("unknown"),
        timestamp: option_env!("CONVERTER_CORE_BUILD_TIMESTAMP").unwrap_or("unknown"),
        profile: option_env!("CONVERTER_CORE_BUILD_PROFILE").unwrap_or("unknown"),
    }
}
