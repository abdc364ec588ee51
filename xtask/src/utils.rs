/// Converts a `PascalCase` grammar rule name (e.g. `VarDecl`) to the
/// `SCREAMING_SNAKE_CASE` a matching `SyntaxKind` variant uses (`VAR_DECL`).
pub(crate) fn to_upper_snake_case(s: &str) -> String {
    let mut buf = String::with_capacity(s.len());
    let mut prev = false;
    for c in s.chars() {
        if c.is_ascii_uppercase() && prev {
            buf.push('_')
        }
        prev = true;

        buf.push(c.to_ascii_uppercase());
    }
    buf
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_multi_word_rule_names() {
        assert_eq!(to_upper_snake_case("VarDecl"), "VAR_DECL");
        assert_eq!(to_upper_snake_case("ForInStmt"), "FOR_IN_STMT");
        assert_eq!(to_upper_snake_case("Program"), "PROGRAM");
    }
}
