/*
 * ==========================================================================
 * EZSCRIPT - Scripts that read like sentences
 * Clock Built-ins
 * ==========================================================================
 *
 * Wall-clock helpers backed by `chrono`, all in local time:
 *
 *   current_time()      "14:05:09"
 *   current_date()      "2024-03-01"
 *   current_datetime()  "2024-03-01 14:05:09"
 *   timestamp()         whole seconds since the Unix epoch
 *
 * --------------------------------------------------------------------------
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

use chrono::{DateTime, Local};

use crate::globals::Builtin;
use crate::value::Value;

pub const TIME_FORMAT: &str = "%H:%M:%S";
pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Reads the clock once and renders it for `builtin`.
pub fn call(builtin: Builtin) -> Value {
    render(builtin, Local::now())
}

fn render(builtin: Builtin, now: DateTime<Local>) -> Value {
    match builtin {
        Builtin::CurrentTime => Value::Str(now.format(TIME_FORMAT).to_string()),
        Builtin::CurrentDate => Value::Str(now.format(DATE_FORMAT).to_string()),
        Builtin::Timestamp => Value::Int(now.timestamp()),
        _ => Value::Str(now.format(DATETIME_FORMAT).to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn formats_match_the_documented_layouts() {
        let Some(now) = Local.with_ymd_and_hms(2024, 3, 1, 14, 5, 9).single() else {
            return;
        };

        assert_eq!(render(Builtin::CurrentTime, now), Value::str("14:05:09"));
        assert_eq!(render(Builtin::CurrentDate, now), Value::str("2024-03-01"));
        assert_eq!(
            render(Builtin::CurrentDatetime, now),
            Value::str("2024-03-01 14:05:09")
        );
        assert_eq!(render(Builtin::Timestamp, now), Value::Int(now.timestamp()));
    }
}
