use crate::path::PathElement;

pub(crate) fn parse_element_path(s: &str) -> Result<Vec<PathElement>, String> {
    if s.is_empty() {
        return Err("Empty path is not allowed".to_string());
    }

    let mut result = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    // set after a closing quote, until the next dot
    let mut closed_quote = false;

    for c in s.chars() {
        match c {
            '\'' => {
                if in_quotes {
                    if current.is_empty() {
                        return Err("Empty quoted string is not allowed".to_string());
                    }
                    result.push(PathElement::Key(current.clone()));
                    current.clear();
                    in_quotes = false;
                    closed_quote = true;
                } else {
                    if !current.is_empty() || closed_quote {
                        return Err("Unexpected quote".to_string());
                    }
                    in_quotes = true;
                }
            }
            '.' => {
                if in_quotes {
                    current.push(c);
                } else if closed_quote {
                    closed_quote = false;
                } else if !current.is_empty() {
                    result.push(segment(&current));
                    current.clear();
                } else if result.is_empty() {
                    return Err("Path cannot start with a dot".to_string());
                } else {
                    return Err("Empty path segment is not allowed".to_string());
                }
            }
            _ => {
                if closed_quote {
                    return Err(format!("Unexpected character after quoted key: {}", c));
                }
                current.push(c);
            }
        }
    }

    if in_quotes {
        return Err("Unclosed quote".to_string());
    }

    if !current.is_empty() {
        result.push(segment(&current));
    }

    if result.is_empty() {
        return Err("Empty path is not allowed".to_string());
    }

    Ok(result)
}

fn segment(raw: &str) -> PathElement {
    match raw {
        "*" => PathElement::AnyKey,
        key => PathElement::Key(key.to_string()),
    }
}
