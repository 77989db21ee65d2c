//! Gateway utility functions.

/// Expand `${VAR}` patterns in a string with environment variable values.
///
/// Unknown variables are replaced with an empty string.
pub fn expand_env_vars(input: &str) -> String {
    let mut result = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && chars.peek() == Some(&'{') {
            chars.next();
            let mut var_name = String::new();
            for c in chars.by_ref() {
                if c == '}' {
                    break;
                }
                var_name.push(c);
            }
            if let Ok(val) = std::env::var(&var_name) {
                result.push_str(&val);
            }
        } else {
            result.push(ch);
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expands_known_variable() {
        unsafe { std::env::set_var("OTTER_TEST_VAR", "value") };
        assert_eq!(expand_env_vars("key = \"${OTTER_TEST_VAR}\""), "key = \"value\"");
    }

    #[test]
    fn unknown_variable_becomes_empty() {
        assert_eq!(expand_env_vars("${OTTER_NO_SUCH_VAR_XYZ}"), "");
    }

    #[test]
    fn plain_text_passes_through() {
        assert_eq!(expand_env_vars("no variables here"), "no variables here");
    }
}
