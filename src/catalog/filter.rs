/// Double-quoted string literal for a Milvus boolean expression.
pub fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' | '\r' | '\t' => out.push(' '),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

pub fn id_equals(id: &str) -> String {
    format!("id == {}", quote(id))
}

/// Infix match on the fields admins search by.
pub fn text_contains(needle: &str) -> String {
    let pattern = quote(&format!("%{needle}%"));
    format!("title like {pattern} or author like {pattern} or categories like {pattern}")
}
