//! MySQL grammar: backtick identifier quoting.

use super::Grammar;

/// MySQL dialect. Inherits the base compiler and overrides identifier
/// quoting: backticks, with dotted names split so each segment is quoted
/// independently. The wildcard passes through untouched.
#[derive(Debug, Default)]
pub struct MysqlGrammar;

impl Grammar for MysqlGrammar {
    fn quote_field(&self, name: &str) -> String {
        if name == "*" {
            return name.to_string();
        }
        name.split('.')
            .map(|segment| {
                if segment == "*" {
                    segment.to_string()
                } else {
                    quote_segment(segment)
                }
            })
            .collect::<Vec<_>>()
            .join(".")
    }

    fn quote_table(&self, name: &str) -> String {
        quote_segment(name)
    }
}

fn quote_segment(segment: &str) -> String {
    format!("`{}`", segment.replace('`', "``"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_field() {
        assert_eq!(MysqlGrammar.quote_field("id"), "`id`");
    }

    #[test]
    fn test_dotted_field_splits() {
        assert_eq!(MysqlGrammar.quote_field("orders.id"), "`orders`.`id`");
        assert_eq!(MysqlGrammar.quote_field("orders.*"), "`orders`.*");
    }

    #[test]
    fn test_wildcard_untouched() {
        assert_eq!(MysqlGrammar.quote_field("*"), "*");
    }

    #[test]
    fn test_embedded_backtick_doubled() {
        assert_eq!(MysqlGrammar.quote_field("we`ird"), "`we``ird`");
    }

    #[test]
    fn test_table() {
        assert_eq!(MysqlGrammar.quote_table("users"), "`users`");
    }
}
