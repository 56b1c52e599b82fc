/*
 * ==========================================================================
 * EZSCRIPT - Scripts that read like sentences
 * ==========================================================================
 *
 * File:     config.rs
 * Purpose:  Runtime limits and knobs read from the environment.
 *
 *   EZSCRIPT_MAX_DEPTH   user-function recursion limit (default 1000)
 *   EZSCRIPT_SEED        fixed seed for the random built-ins
 *   EZSCRIPT_LOG         tracing filter for the binary (default "warn")
 *
 * Author:   Sam Wilcox
 *
 * License:
 * This file is part of the EzScript programming language project.
 *
 * EzScript is dual-licensed under the terms of:
 *   - The MIT License
 *   - The Apache License, Version 2.0
 *
 * You may choose either license to govern your use of this software.
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under these licenses is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 *
 * ==========================================================================
 */

use std::env;
use std::str::FromStr;

use tracing::warn;

/// File extension every script must carry.
pub const SCRIPT_EXTENSION: &str = "ez";

pub const MAX_DEPTH_VAR: &str = "EZSCRIPT_MAX_DEPTH";
pub const SEED_VAR: &str = "EZSCRIPT_SEED";
pub const LOG_VAR: &str = "EZSCRIPT_LOG";

/// Filter used when `EZSCRIPT_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "warn";

pub const DEFAULT_MAX_CALL_DEPTH: usize = 1000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Deepest allowed chain of user-function calls.
    pub max_call_depth: usize,

    /// Seed for `random`, `choice`, `shuffle`, ... `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
            seed: None,
        }
    }
}

impl Config {
    /// Defaults overridden by `EZSCRIPT_*` variables. Values that do not
    /// parse are reported and ignored.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(depth) = read_var::<usize>(MAX_DEPTH_VAR) {
            config.max_call_depth = depth;
        }
        config.seed = read_var::<u64>(SEED_VAR);

        config
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_max_call_depth(mut self, depth: usize) -> Self {
        self.max_call_depth = depth;
        self
    }
}

fn read_var<T: FromStr>(name: &str) -> Option<T> {
    let raw = env::var(name).ok()?;
    match raw.trim().parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(variable = name, value = %raw, "ignoring unparseable setting");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.max_call_depth, 1000);
        assert_eq!(config.seed, None);
    }

    #[test]
    fn builders_override() {
        let config = Config::default().with_seed(7).with_max_call_depth(50);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.max_call_depth, 50);
    }
}
