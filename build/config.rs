/**
Converts environment variables into Cargo cfgs that can then be used in code.
Crates can opt-in to a standard set of cross-cutting configurations by using [`Cfgs`].
*/
pub mod config {
    use std::{collections::HashSet, env};

    #[derive(Debug)]
    pub struct Cfgs {
        enabled: HashSet<String>,
    }

    pub struct Cfg(&'static str);

    impl Cfgs {
        /**
        Perform a checked build.

        These builds do extra checking and are suitable for testing and fuzzing.
        */
        pub const FEEDCORE_CHECKED: Cfg = Cfg("checked");

        /**
        Create a build configuration and read the default variables.
        */
        pub fn new() -> Self {
            let mut enabled = HashSet::new();

            cfg_from_env_value("release", "PROFILE", "release", &mut enabled);
            cfg_from_env_value("debug", "PROFILE", "debug", &mut enabled);

            if unstable() {
                enabled.insert("unstable".to_owned());
            }

            cfg_from_env_present(Self::FEEDCORE_CHECKED.0, &mut enabled);

            Cfgs { enabled }
        }

        pub fn is_debug(&self) -> bool {
            self.enabled.contains("debug")
        }

        pub fn is_release(&self) -> bool {
            self.enabled.contains("release")
        }

        pub fn is_checked(&self) -> bool {
            self.enabled.contains(Self::FEEDCORE_CHECKED.0)
        }

        pub fn is_unstable(&self) -> bool {
            self.enabled.contains("unstable")
        }

        pub fn is_enabled(&self, cfg: Cfg) -> bool {
            self.enabled.contains(cfg.0)
        }

        pub fn enable(&mut self, cfg: Cfg) {
            self.enabled.insert(cfg.0.into());
        }

        pub fn apply(self) {
            for cfg in &["checked", "debug", "release", "unstable"] {
                println!("cargo:rustc-check-cfg=cfg({})", cfg);
            }

            for cfg in &self.enabled {
                println!("cargo:rustc-cfg={}", cfg);
            }

            println!("cargo:rerun-if-changed=build.rs")
        }
    }

    fn cfg_from_env_present(cfg: impl AsRef<str>, enabled: &mut HashSet<String>) {
        let cfg = cfg.as_ref();

        let var = format!("FEEDCORE_{}", cfg.to_uppercase());
        println!("cargo:rerun-if-env-changed={}", var);

        if let Ok(env_cfg) = env::var(var) {
            if env_cfg != "0" {
                enabled.insert(cfg.into());
            } else {
                enabled.remove(cfg);
            }
        }
    }

    fn cfg_from_env_value(
        cfg: impl AsRef<str>,
        key: impl AsRef<str>,
        value: impl AsRef<str>,
        enabled: &mut HashSet<String>,
    ) {
        println!("cargo:rerun-if-env-changed={}", key.as_ref());

        if let Ok(cargo_cfg) = env::var(key.as_ref()) {
            if cargo_cfg == value.as_ref() {
                enabled.insert(cfg.as_ref().into());
            }
        }
    }

    fn unstable() -> bool {
        version_check::is_feature_flaggable().unwrap_or(false)
    }
}
