/// Hard cap on the number of parameters taken from one line.
pub const MAX_MSG_TOKENS: usize = 10;

/// Splits `line` on `delim` into at most [`MAX_MSG_TOKENS`] tokens.
///
/// When the text right after a delimiter starts with `:`, the colon is dropped
/// and the rest of the line, delimiters included, becomes the final token.
/// Text past the token cap is discarded.
pub fn tokenize(line: &str, delim: char) -> Vec<String> {
    let mut tokens = vec![];
    let mut current = line;

    while tokens.len() < MAX_MSG_TOKENS {
        match current.find(delim) {
            Some(next) => {
                tokens.push(current[..next].to_string());
                current = &current[next + delim.len_utf8()..];

                if tokens.len() < MAX_MSG_TOKENS {
                    if let Some(trailing) = current.strip_prefix(':') {
                        tokens.push(trailing.to_string());
                        break;
                    }
                }
            }
            None => {
                tokens.push(current.to_string());
                break;
            }
        }
    }

    tokens
}
