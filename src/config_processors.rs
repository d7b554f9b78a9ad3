use justconfig::error::ConfigError;
use justconfig::item::{MapAction, StringItem};

/// Strips one pair of matching quotes (`"` or `'`) around configuration values.
///
/// Values without surrounding quotes are kept as they are, so both
/// `store_path = "./catalog.db"` and `store_path = ./catalog.db` work.
pub trait Unquote
where
    Self: Sized,
{
    fn unquote(self) -> Result<StringItem, ConfigError>;
}

impl Unquote for Result<StringItem, ConfigError> {
    fn unquote(self) -> Result<StringItem, ConfigError> {
        self?.map(|value| match strip_quotes(value) {
            Some(unquoted) => MapAction::Replace(vec![unquoted.to_owned()]),
            None => MapAction::Keep,
        })
    }
}

fn strip_quotes(value: &str) -> Option<&str> {
    let value = value.trim();
    ['"', '\'']
        .iter()
        .filter(|quote| value.len() >= 2 && value.starts_with(**quote) && value.ends_with(**quote))
        .map(|_| &value[1..value.len() - 1])
        .next()
}

#[cfg(test)]
mod unquote_test {
    use justconfig::item::ValueExtractor;
    use justconfig::sources::defaults::Defaults;
    use justconfig::{ConfPath, Config};

    use super::*;

    fn config_with(value: &str) -> Config {
        let mut conf = Config::default();
        let mut defaults = Defaults::default();
        defaults.set(conf.root().push_all(&["data", "store_path"]), value, "unit test");
        conf.add_source(defaults);
        conf
    }

    #[test]
    fn should_strip_double_and_single_quotes() {
        for raw in &["\"./catalog.db\"", "'./catalog.db'", " \"./catalog.db\" "] {
            let conf = config_with(raw);
            let value: String = conf
                .get(ConfPath::from(&["data", "store_path"]))
                .unquote()
                .value()
                .unwrap();
            assert_eq!("./catalog.db", value);
        }
    }

    #[test]
    fn should_keep_unquoted_and_mismatched_values() {
        assert_eq!(None, strip_quotes("./catalog.db"));
        assert_eq!(None, strip_quotes("\"./catalog.db'"));
        assert_eq!(None, strip_quotes("\""));
        assert_eq!(Some(""), strip_quotes("\"\""));
    }
}
