//! Form key tokenizer: `site.posts[0]["meta.data"].tags` → segments.
//!
//! Grammar, scanned left to right:
//! - a run of characters other than `.`, `[`, `]` is a plain key;
//! - `[` `-?digits(.digits)?` `]` is an index segment;
//! - `['…']` / `["…"]` is a literal key, a backslash escapes the next char;
//! - any other `[`, `]` or `.` is a separator and is skipped.
//!
//! Empty segments are dropped, so `tags[]` is just `["tags"]`.

pub fn tokenize_key(key: &str) -> Vec<String> {
    let chars: Vec<char> = key.chars().collect();
    let mut out = Vec::<String>::new();
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            '[' => match bracket_index(&chars, i).or_else(|| bracket_quoted(&chars, i)) {
                Some((segment, next)) => {
                    out.push(segment);
                    i = next;
                }
                None => i += 1,
            },
            '.' | ']' => i += 1,
            _ => {
                let start = i;
                while i < chars.len() && !matches!(chars[i], '.' | '[' | ']') {
                    i += 1;
                }
                out.push(chars[start..i].iter().collect());
            }
        }
    }

    out.retain(|s| !s.is_empty());
    out
}

/// True when `segment` names a sequence slot: ASCII digits only, within `max_index`.
pub fn index_of(segment: &str, max_index: usize) -> Option<usize> {
    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    segment.parse::<usize>().ok().filter(|idx| *idx <= max_index)
}

// `[-12]`, `[3.5]` → ("-12", next), ("3.5", next)
fn bracket_index(chars: &[char], open: usize) -> Option<(String, usize)> {
    let mut i = open + 1;
    let start = i;
    if chars.get(i) == Some(&'-') {
        i += 1;
    }
    let digits = count_digits(chars, i);
    if digits == 0 {
        return None;
    }
    i += digits;
    if chars.get(i) == Some(&'.') {
        let frac = count_digits(chars, i + 1);
        if frac == 0 {
            return None;
        }
        i += 1 + frac;
    }
    if chars.get(i) != Some(&']') {
        return None;
    }
    Some((chars[start..i].iter().collect(), i + 1))
}

fn count_digits(chars: &[char], from: usize) -> usize {
    chars.iter().skip(from).take_while(|c| c.is_ascii_digit()).count()
}

// `['a.b']`, `["say \"hi\""]`; the closing quote must be followed by `]`
fn bracket_quoted(chars: &[char], open: usize) -> Option<(String, usize)> {
    let quote = *chars.get(open + 1)?;
    if quote != '\'' && quote != '"' {
        return None;
    }
    let mut out = String::new();
    let mut i = open + 2;
    loop {
        match *chars.get(i)? {
            '\\' => {
                out.push(*chars.get(i + 1)?);
                i += 2;
            }
            c if c == quote => {
                return (chars.get(i + 1) == Some(&']')).then(|| (out, i + 2));
            }
            c => {
                out.push(c);
                i += 1;
            }
        }
    }
}

// ------------------------------- Tests ------------------------------------ //
