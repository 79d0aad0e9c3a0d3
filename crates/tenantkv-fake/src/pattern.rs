//! Redis glob-style key patterns

/// Check whether `key` matches a Redis `KEYS` pattern
///
/// Supports `*`, `?`, character classes (`[abc]`, `[a-z]`, `[^x]`) and
/// `\` escapes.
pub fn pattern_matches(pattern: &str, key: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let key: Vec<char> = key.chars().collect();
    match_from(&pattern, &key)
}

fn match_from(pattern: &[char], key: &[char]) -> bool {
    let Some((&head, rest)) = pattern.split_first() else {
        return key.is_empty();
    };

    match head {
        '*' => {
            // Collapse runs of stars, then try every split point
            let rest = trim_leading_stars(rest);
            if rest.is_empty() {
                return true;
            }
            (0..=key.len()).any(|skip| match_from(rest, &key[skip..]))
        }
        '?' => !key.is_empty() && match_from(rest, &key[1..]),
        '[' => {
            let Some((&c, key_rest)) = key.split_first() else {
                return false;
            };
            let (matched, after_class) = match_class(rest, c);
            matched && match_from(after_class, key_rest)
        }
        '\\' => match rest.split_first() {
            Some((&escaped, rest)) => {
                key.first() == Some(&escaped) && match_from(rest, &key[1..])
            }
            // Trailing backslash matches itself
            None => key.len() == 1 && key[0] == '\\',
        },
        literal => key.first() == Some(&literal) && match_from(rest, &key[1..]),
    }
}

fn trim_leading_stars(pattern: &[char]) -> &[char] {
    let stars = pattern.iter().take_while(|&&c| c == '*').count();
    &pattern[stars..]
}

/// Match `c` against the class body that follows `[`
///
/// Returns whether it matched and the pattern remaining after `]`. An
/// unterminated class consumes the rest of the pattern.
fn match_class(body: &[char], c: char) -> (bool, &[char]) {
    let (negated, mut i) = match body.first() {
        Some('^') => (true, 1),
        _ => (false, 0),
    };
    let mut matched = false;

    while i < body.len() && body[i] != ']' {
        if body[i] == '\\' && i + 1 < body.len() {
            matched |= body[i + 1] == c;
            i += 2;
        } else if i + 2 < body.len() && body[i + 1] == '-' && body[i + 2] != ']' {
            let (lo, hi) = if body[i] <= body[i + 2] {
                (body[i], body[i + 2])
            } else {
                (body[i + 2], body[i])
            };
            matched |= (lo..=hi).contains(&c);
            i += 3;
        } else {
            matched |= body[i] == c;
            i += 1;
        }
    }

    let remaining = if i < body.len() { &body[i + 1..] } else { &body[i..] };
    (matched != negated, remaining)
}
