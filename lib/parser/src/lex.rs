//! Recognizers for the terminals of the [SPARQL grammar](https://www.w3.org/TR/sparql11-query/#terminals).
//!
//! Each recognizer looks at the start of its input and returns the byte length of the longest
//! match, or `None`. They never look behind and hold no state, so the parser is free to call them
//! again after backtracking.

fn is_pn_chars_base(c: char) -> bool {
    matches!(c,
        'A'..='Z'
        | 'a'..='z'
        | '\u{C0}'..='\u{D6}'
        | '\u{D8}'..='\u{F6}'
        | '\u{F8}'..='\u{2FF}'
        | '\u{370}'..='\u{37D}'
        | '\u{37F}'..='\u{1FFF}'
        | '\u{200C}'..='\u{200D}'
        | '\u{2070}'..='\u{218F}'
        | '\u{2C00}'..='\u{2FEF}'
        | '\u{3001}'..='\u{D7FF}'
        | '\u{F900}'..='\u{FDCF}'
        | '\u{FDF0}'..='\u{FFFD}'
        | '\u{10000}'..='\u{EFFFF}')
}

fn is_pn_chars_u(c: char) -> bool {
    c == '_' || is_pn_chars_base(c)
}

fn is_varname_char(c: char) -> bool {
    is_pn_chars_u(c)
        || c.is_ascii_digit()
        || matches!(c, '\u{B7}' | '\u{300}'..='\u{36F}' | '\u{203F}'..='\u{2040}')
}

fn is_pn_chars(c: char) -> bool {
    c == '-' || is_varname_char(c)
}

/// Whether `c` may continue a word, i.e. whether a keyword followed by `c` is not a keyword.
pub(crate) fn is_word_char(c: char) -> bool {
    c == ':' || is_pn_chars(c)
}

fn first_char(input: &str) -> Option<char> {
    input.chars().next()
}

fn digits(input: &str) -> usize {
    input.bytes().take_while(u8::is_ascii_digit).count()
}

/// Whitespace and `#` comments.
pub(crate) fn trivia(input: &str) -> usize {
    let mut pos = 0;
    let bytes = input.as_bytes();
    while let Some(&b) = bytes.get(pos) {
        match b {
            b' ' | b'\t' | b'\n' | b'\r' => pos += 1,
            b'#' => {
                pos += bytes[pos..]
                    .iter()
                    .take_while(|b| !matches!(b, b'\n' | b'\r'))
                    .count();
            }
            _ => break,
        }
    }
    pos
}

/// A keyword, matched case-insensitively and not followed by a word character.
pub(crate) fn keyword(input: &str, keyword: &str) -> Option<usize> {
    let candidate = input.get(..keyword.len())?;
    if !candidate.eq_ignore_ascii_case(keyword) {
        return None;
    }
    match first_char(&input[keyword.len()..]) {
        Some(c) if is_word_char(c) => None,
        _ => Some(keyword.len()),
    }
}

/// `UCHAR`: `\uXXXX` or `\UXXXXXXXX`.
fn uchar(input: &str) -> Option<usize> {
    let hex_digits = if input.starts_with("\\u") {
        4
    } else if input.starts_with("\\U") {
        8
    } else {
        return None;
    };
    let hex = input.get(2..2 + hex_digits)?;
    hex.bytes()
        .all(|b| b.is_ascii_hexdigit())
        .then_some(2 + hex_digits)
}

/// `ECHAR` or `UCHAR`.
fn string_escape(input: &str) -> Option<usize> {
    match input.as_bytes() {
        [b'\\', b't' | b'b' | b'n' | b'r' | b'f' | b'"' | b'\'' | b'\\', ..] => Some(2),
        _ => uchar(input),
    }
}

/// `IRIREF`
pub(crate) fn iriref(input: &str) -> Option<usize> {
    if !input.starts_with('<') {
        return None;
    }
    let mut pos = 1;
    loop {
        let c = first_char(&input[pos..])?;
        match c {
            '>' => return Some(pos + 1),
            '\\' => pos += uchar(&input[pos..])?,
            '<' | '"' | '{' | '}' | '|' | '^' | '`' => return None,
            c if c <= ' ' => return None,
            c => pos += c.len_utf8(),
        }
    }
}

/// `PNAME_NS`, including the trailing `:`.
pub(crate) fn pname_ns(input: &str) -> Option<usize> {
    let first = first_char(input)?;
    if first == ':' {
        return Some(1);
    }
    if !is_pn_chars_base(first) {
        return None;
    }
    let mut pos = first.len_utf8();
    let mut last = first;
    for c in input[pos..].chars() {
        if !is_pn_chars(c) && c != '.' {
            break;
        }
        pos += c.len_utf8();
        last = c;
    }
    (last != '.' && input[pos..].starts_with(':')).then_some(pos + 1)
}

/// `PLX`: a percent encoded byte or a `PN_LOCAL_ESC`.
fn plx(input: &str) -> Option<usize> {
    match input.as_bytes() {
        [b'%', a, b, ..] if a.is_ascii_hexdigit() && b.is_ascii_hexdigit() => Some(3),
        [b'\\', b'_' | b'~' | b'.' | b'-' | b'!' | b'$' | b'&' | b'\'' | b'(' | b')' | b'*'
        | b'+' | b',' | b';' | b'=' | b'/' | b'?' | b'#' | b'@' | b'%', ..] => Some(2),
        _ => None,
    }
}

/// `PN_LOCAL`
pub(crate) fn pn_local(input: &str) -> Option<usize> {
    let mut pos = 0;
    // A local name must not end with an unescaped '.'.
    let mut end = 0;
    loop {
        let rest = &input[pos..];
        if let Some(len) = plx(rest) {
            pos += len;
            end = pos;
            continue;
        }
        let Some(c) = first_char(rest) else {
            break;
        };
        let accepted = if pos == 0 {
            is_pn_chars_u(c) || c == ':' || c.is_ascii_digit()
        } else {
            is_pn_chars(c) || c == ':' || c == '.'
        };
        if !accepted {
            break;
        }
        pos += c.len_utf8();
        if c != '.' {
            end = pos;
        }
    }
    (end > 0).then_some(end)
}

/// `BLANK_NODE_LABEL`
pub(crate) fn blank_node_label(input: &str) -> Option<usize> {
    let rest = input.strip_prefix("_:")?;
    let first = first_char(rest)?;
    if !is_pn_chars_u(first) && !first.is_ascii_digit() {
        return None;
    }
    let mut pos = first.len_utf8();
    let mut end = pos;
    for c in rest[pos..].chars() {
        if !is_pn_chars(c) && c != '.' {
            break;
        }
        pos += c.len_utf8();
        if c != '.' {
            end = pos;
        }
    }
    Some(2 + end)
}

/// `VAR1` or `VAR2`, including the sigil.
pub(crate) fn var(input: &str) -> Option<usize> {
    let rest = input
        .strip_prefix('?')
        .or_else(|| input.strip_prefix('$'))?;
    let first = first_char(rest)?;
    if !is_pn_chars_u(first) && !first.is_ascii_digit() {
        return None;
    }
    let len: usize = rest
        .chars()
        .take_while(|c| is_varname_char(*c))
        .map(char::len_utf8)
        .sum();
    Some(1 + len)
}

/// `LANGTAG`, including the `@`.
pub(crate) fn langtag(input: &str) -> Option<usize> {
    let rest = input.strip_prefix('@')?;
    let mut pos = rest
        .bytes()
        .take_while(u8::is_ascii_alphabetic)
        .count();
    if pos == 0 {
        return None;
    }
    while rest[pos..].starts_with('-') {
        let len = rest[pos + 1..]
            .bytes()
            .take_while(u8::is_ascii_alphanumeric)
            .count();
        if len == 0 {
            break;
        }
        pos += 1 + len;
    }
    Some(1 + pos)
}

fn exponent(input: &str) -> Option<usize> {
    let rest = input
        .strip_prefix('e')
        .or_else(|| input.strip_prefix('E'))?;
    let sign = usize::from(rest.starts_with(['+', '-']));
    let len = digits(&rest[sign..]);
    (len > 0).then_some(1 + sign + len)
}

/// `DOUBLE`
fn double(input: &str) -> Option<usize> {
    let integer = digits(input);
    let mut pos = integer;
    if input[pos..].starts_with('.') {
        let fraction = digits(&input[pos + 1..]);
        if integer == 0 && fraction == 0 {
            return None;
        }
        pos += 1 + fraction;
    } else if integer == 0 {
        return None;
    }
    exponent(&input[pos..]).map(|len| pos + len)
}

/// `DECIMAL`
fn decimal(input: &str) -> Option<usize> {
    let integer = digits(input);
    let fraction = digits(input[integer..].strip_prefix('.')?);
    (fraction > 0).then_some(integer + 1 + fraction)
}

/// `INTEGER`
pub(crate) fn integer(input: &str) -> Option<usize> {
    let len = digits(input);
    (len > 0).then_some(len)
}

/// A signed or unsigned `DOUBLE`, `DECIMAL` or `INTEGER`.
pub(crate) fn numeric_literal(input: &str) -> Option<usize> {
    let sign = usize::from(input.starts_with(['+', '-']));
    let rest = &input[sign..];
    double(rest)
        .or_else(|| decimal(rest))
        .or_else(|| integer(rest))
        .map(|len| sign + len)
}

/// One of the four `STRING_LITERAL` forms. Returns the total length and the length of the quote.
pub(crate) fn string_literal(input: &str) -> Option<(usize, usize)> {
    for quote in ["\"\"\"", "'''"] {
        if input.starts_with(quote) {
            return long_string(input, quote).map(|len| (len, quote.len()));
        }
    }
    let quote = first_char(input).filter(|c| matches!(c, '"' | '\''))?;
    let mut pos = 1;
    loop {
        match first_char(&input[pos..])? {
            '\\' => pos += string_escape(&input[pos..])?,
            '\n' | '\r' => return None,
            c if c == quote => return Some((pos + 1, 1)),
            c => pos += c.len_utf8(),
        }
    }
}

fn long_string(input: &str, quote: &str) -> Option<usize> {
    let mut pos = quote.len();
    loop {
        let rest = &input[pos..];
        if rest.starts_with(quote) {
            return Some(pos + quote.len());
        }
        match first_char(rest)? {
            '\\' => pos += string_escape(rest)?,
            c => pos += c.len_utf8(),
        }
    }
}

/// `NIL`: `(` and `)` with only whitespace in between.
pub(crate) fn nil(input: &str) -> Option<usize> {
    let rest = input.strip_prefix('(')?;
    let len = trivia(rest);
    rest[len..].starts_with(')').then_some(len + 2)
}

/// `ANON`: `[` and `]` with only whitespace in between.
pub(crate) fn anon(input: &str) -> Option<usize> {
    let rest = input.strip_prefix('[')?;
    let len = trivia(rest);
    rest[len..].starts_with(']').then_some(len + 2)
}
