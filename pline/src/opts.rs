//
// Copyright (c) The Pline Core Contributors
//
// SPDX-License-Identifier: MIT
//

//! Parser and display options.

use std::path::Path;

use crate::error::Error;

/// Recognized options. Only `first_key_w_stmt`, `keys_w_stmt`,
/// `default_keys` and `enable_nacm` affect parsing; the rest belong to the
/// configuration renderer and are carried for it.
#[derive(Clone, Debug)]
pub struct ParseOpts {
    pub begin_bracket: char,
    pub end_bracket: char,
    pub show_brackets: bool,
    pub show_semicolons: bool,
    /// When true, the first list key must be preceded by its key name.
    pub first_key_w_stmt: bool,
    /// When true, list keys are named (`key1 v1 key2 v2`, any order);
    /// when false, all keys are positional in schema order.
    pub keys_w_stmt: bool,
    pub colorize: bool,
    pub indent: u8,
    /// When true, list keys carrying an extension-provided default value
    /// may be omitted from the input.
    pub default_keys: bool,
    pub show_default_keys: bool,
    pub hide_passwords: bool,
    /// When false, the access-control module is hidden from parsing.
    pub enable_nacm: bool,
    pub oneliners: bool,
}

// ===== impl ParseOpts =====

impl ParseOpts {
    /// Merges options from an INI-style string. Recognized keys take
    /// boolean `y`/`n` or decimal values; unknown keys are ignored.
    pub fn parse_str(&mut self, text: &str) -> Result<(), Error> {
        for (num, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                return Err(Error::ConfigSyntax(num + 1));
            };
            let key = key.trim();
            let value = value.trim().trim_matches('"');

            match key {
                "ShowBrackets" => set_bool(&mut self.show_brackets, value),
                "ShowSemicolons" => {
                    set_bool(&mut self.show_semicolons, value)
                }
                "FirstKeyWithStatement" => {
                    set_bool(&mut self.first_key_w_stmt, value)
                }
                "KeysWithStatement" => set_bool(&mut self.keys_w_stmt, value),
                "Colorize" => set_bool(&mut self.colorize, value),
                "Indent" => {
                    if let Ok(indent) = value.parse() {
                        self.indent = indent;
                    }
                }
                "DefaultKeys" => set_bool(&mut self.default_keys, value),
                "ShowDefaultKeys" => {
                    set_bool(&mut self.show_default_keys, value)
                }
                "HidePasswords" => set_bool(&mut self.hide_passwords, value),
                "EnableNACM" => set_bool(&mut self.enable_nacm, value),
                "Oneliners" => set_bool(&mut self.oneliners, value),
                _ => (),
            }
        }

        Ok(())
    }

    /// Merges options from an INI-style configuration file.
    pub fn parse_file(&mut self, path: impl AsRef<Path>) -> Result<(), Error> {
        let text =
            std::fs::read_to_string(path).map_err(Error::ConfigRead)?;
        self.parse_str(&text)
    }
}

impl Default for ParseOpts {
    fn default() -> ParseOpts {
        ParseOpts {
            begin_bracket: '{',
            end_bracket: '}',
            show_brackets: true,
            show_semicolons: true,
            first_key_w_stmt: false,
            keys_w_stmt: true,
            colorize: true,
            indent: 2,
            default_keys: false,
            show_default_keys: false,
            hide_passwords: true,
            enable_nacm: false,
            oneliners: true,
        }
    }
}

// Only explicit "y"/"n" values change a boolean option.
fn set_bool(option: &mut bool, value: &str) {
    match value {
        "y" => *option = true,
        "n" => *option = false,
        _ => (),
    }
}

// ===== tests =====

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let opts = ParseOpts::default();
        assert_eq!(opts.begin_bracket, '{');
        assert_eq!(opts.end_bracket, '}');
        assert!(opts.show_brackets);
        assert!(opts.show_semicolons);
        assert!(!opts.first_key_w_stmt);
        assert!(opts.keys_w_stmt);
        assert!(opts.colorize);
        assert_eq!(opts.indent, 2);
        assert!(!opts.default_keys);
        assert!(!opts.show_default_keys);
        assert!(opts.hide_passwords);
        assert!(!opts.enable_nacm);
        assert!(opts.oneliners);
    }

    #[test]
    fn test_parse_str() {
        let mut opts = ParseOpts::default();
        opts.parse_str(
            "ShowBrackets=n\n\
             # comment\n\
             KeysWithStatement=n\n\
             Indent=4\n\
             EnableNACM=y\n",
        )
        .unwrap();
        assert!(!opts.show_brackets);
        assert!(!opts.keys_w_stmt);
        assert_eq!(opts.indent, 4);
        assert!(opts.enable_nacm);
    }

    #[test]
    fn test_parse_str_lenient_values() {
        let mut opts = ParseOpts::default();
        // Unknown keys and non-"y"/"n" boolean values are ignored.
        opts.parse_str("NoSuchKey=y\nColorize=maybe\n").unwrap();
        assert!(opts.colorize);
    }

    #[test]
    fn test_parse_str_malformed() {
        let mut opts = ParseOpts::default();
        assert!(matches!(
            opts.parse_str("ShowBrackets\n"),
            Err(Error::ConfigSyntax(1))
        ));
    }

    #[test]
    fn test_parse_empty_is_idempotent() {
        let mut opts = ParseOpts::default();
        opts.parse_str("").unwrap();
        let dflt = ParseOpts::default();
        assert_eq!(opts.keys_w_stmt, dflt.keys_w_stmt);
        assert_eq!(opts.indent, dflt.indent);
        assert_eq!(opts.hide_passwords, dflt.hide_passwords);
    }
}
