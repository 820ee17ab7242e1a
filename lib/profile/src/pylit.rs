//! Reader for Python literal syntax, the shape scraped payloads take when a
//! dict or list was stringified with `repr()` instead of serialized as JSON.
//!
//! Supports dicts, lists, tuples, sets (as arrays), quoted strings with the
//! usual escapes and `u`/`r`/`b` prefixes, numbers, `True`, `False` and `None`.

use serde_json::{Map, Number, Value};

const MAX_DEPTH: usize = 128;

/// Parse a complete Python literal. Trailing input makes the parse fail.
pub fn parse_python_literal(input: &str) -> Option<Value> {
    let mut parser = LiteralParser {
        chars: input.chars().collect(),
        pos: 0,
    };
    let value = parser.value(0)?;
    parser.skip_ws();
    (parser.pos == parser.chars.len()).then_some(value)
}

struct LiteralParser {
    chars: Vec<char>,
    pos: usize,
}

impl LiteralParser {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.pos += 1;
        }
    }

    fn eat(&mut self, expected: char) -> bool {
        self.skip_ws();
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn value(&mut self, depth: usize) -> Option<Value> {
        if depth > MAX_DEPTH {
            return None;
        }
        self.skip_ws();
        match self.peek()? {
            '{' => self.dict_or_set(depth),
            '[' => {
                self.pos += 1;
                self.sequence(']', depth).map(Value::Array)
            }
            '(' => self.tuple(depth),
            '\'' | '"' => self.string(false).map(Value::String),
            c if c.is_ascii_digit() || matches!(c, '-' | '+' | '.') => self.number(),
            c if c.is_ascii_alphabetic() => self.word(),
            _ => None,
        }
    }

    fn sequence(&mut self, close: char, depth: usize) -> Option<Vec<Value>> {
        let mut items = Vec::new();
        loop {
            if self.eat(close) {
                return Some(items);
            }
            items.push(self.value(depth + 1)?);
            if self.eat(',') {
                continue;
            }
            return self.eat(close).then_some(items);
        }
    }

    /// `(x)` is a parenthesized value, `(x,)` and `(x, y)` are tuples.
    fn tuple(&mut self, depth: usize) -> Option<Value> {
        self.pos += 1;
        let mut items = Vec::new();
        let mut saw_comma = false;
        loop {
            if self.eat(')') {
                break;
            }
            items.push(self.value(depth + 1)?);
            if self.eat(',') {
                saw_comma = true;
                continue;
            }
            if self.eat(')') {
                break;
            }
            return None;
        }

        if items.len() == 1 && !saw_comma {
            items.pop()
        } else {
            Some(Value::Array(items))
        }
    }

    fn dict_or_set(&mut self, depth: usize) -> Option<Value> {
        self.pos += 1;
        if self.eat('}') {
            return Some(Value::Object(Map::new()));
        }

        let first = self.value(depth + 1)?;
        if self.eat(':') {
            let mut map = Map::new();
            let value = self.value(depth + 1)?;
            map.insert(key_string(first), value);
            loop {
                if self.eat('}') {
                    return Some(Value::Object(map));
                }
                if !self.eat(',') {
                    return None;
                }
                if self.eat('}') {
                    return Some(Value::Object(map));
                }
                let key = self.value(depth + 1)?;
                if !self.eat(':') {
                    return None;
                }
                let value = self.value(depth + 1)?;
                map.insert(key_string(key), value);
            }
        }

        let mut items = vec![first];
        loop {
            if self.eat('}') {
                return Some(Value::Array(items));
            }
            if !self.eat(',') {
                return None;
            }
            if self.eat('}') {
                return Some(Value::Array(items));
            }
            items.push(self.value(depth + 1)?);
        }
    }

    fn word(&mut self) -> Option<Value> {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_ascii_alphanumeric() || c == '_') {
            self.pos += 1;
        }
        let word: String = self.chars[start..self.pos].iter().collect();

        if matches!(self.peek(), Some('\'' | '"')) {
            let prefix = word.to_ascii_lowercase();
            if matches!(prefix.as_str(), "u" | "r" | "b" | "rb" | "br") {
                return self.string(prefix.contains('r')).map(Value::String);
            }
            return None;
        }

        match word.as_str() {
            "True" => Some(Value::Bool(true)),
            "False" => Some(Value::Bool(false)),
            "None" => Some(Value::Null),
            _ => None,
        }
    }

    fn string(&mut self, raw: bool) -> Option<String> {
        let quote = self.bump()?;
        let triple = self.peek() == Some(quote) && self.peek_at(1) == Some(quote);
        if triple {
            self.pos += 2;
        }

        let mut out = String::new();
        loop {
            let c = self.bump()?;
            if c == quote {
                if !triple {
                    return Some(out);
                }
                if self.peek() == Some(quote) && self.peek_at(1) == Some(quote) {
                    self.pos += 2;
                    return Some(out);
                }
                out.push(c);
                continue;
            }
            if c != '\\' {
                out.push(c);
                continue;
            }

            let escaped = self.bump()?;
            if raw {
                out.push('\\');
                out.push(escaped);
                continue;
            }
            match escaped {
                'n' => out.push('\n'),
                't' => out.push('\t'),
                'r' => out.push('\r'),
                '0' => out.push('\0'),
                '\\' => out.push('\\'),
                '\'' => out.push('\''),
                '"' => out.push('"'),
                '\n' => {}
                'x' => out.push(self.hex_char(2)?),
                'u' => out.push(self.hex_char(4)?),
                'U' => out.push(self.hex_char(8)?),
                other => {
                    out.push('\\');
                    out.push(other);
                }
            }
        }
    }

    fn hex_char(&mut self, digits: usize) -> Option<char> {
        let end = self.pos.checked_add(digits)?;
        let hex: String = self.chars.get(self.pos..end)?.iter().collect();
        self.pos = end;
        u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32)
    }

    fn number(&mut self) -> Option<Value> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            let sign_ok = matches!(c, '+' | '-')
                && (self.pos == start || matches!(self.chars[self.pos - 1], 'e' | 'E'));
            if c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '_') || sign_ok {
                self.pos += 1;
            } else {
                break;
            }
        }

        let literal: String = self.chars[start..self.pos]
            .iter()
            .filter(|c| **c != '_')
            .collect();
        let is_float = literal.contains(['.', 'e', 'E']);

        if !is_float {
            if let Ok(i) = literal.parse::<i64>() {
                return Some(Value::Number(i.into()));
            }
            if let Ok(u) = literal.parse::<u64>() {
                return Some(Value::Number(u.into()));
            }
        }
        literal
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number)
    }
}

fn key_string(key: Value) -> String {
    match key {
        Value::String(s) => s,
        Value::Null => "None".to_string(),
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_repr_dict() {
        let value = parse_python_literal(
            "{'name': 'Ana', 'skills': ['Rust', \"C++\"], 'remote': True, 'manager': None}",
        )
        .unwrap();
        assert_eq!(
            value,
            json!({"name": "Ana", "skills": ["Rust", "C++"], "remote": true, "manager": null})
        );
    }

    #[test]
    fn test_numbers() {
        assert_eq!(parse_python_literal("[1, -2, 3.5, 1e3, 1_000]").unwrap(), json!([1, -2, 3.5, 1000.0, 1000]));
    }

    #[test]
    fn test_tuples_and_sets() {
        assert_eq!(parse_python_literal("(1, 2)").unwrap(), json!([1, 2]));
        assert_eq!(parse_python_literal("(1,)").unwrap(), json!([1]));
        assert_eq!(parse_python_literal("(1)").unwrap(), json!(1));
        assert_eq!(parse_python_literal("{'a', 'b'}").unwrap(), json!(["a", "b"]));
        assert_eq!(parse_python_literal("{}").unwrap(), json!({}));
    }

    #[test]
    fn test_string_escapes_and_prefixes() {
        assert_eq!(parse_python_literal(r"'it\'s'").unwrap(), json!("it's"));
        assert_eq!(parse_python_literal(r"'caf\xe9'").unwrap(), json!("café"));
        assert_eq!(parse_python_literal(r"u'é'").unwrap(), json!("é"));
        assert_eq!(parse_python_literal(r"r'a\nb'").unwrap(), json!("a\\nb"));
        assert_eq!(parse_python_literal("'''multi\nline'''").unwrap(), json!("multi\nline"));
    }

    #[test]
    fn test_non_string_keys() {
        assert_eq!(parse_python_literal("{1: 'a', None: 'b'}").unwrap(), json!({"1": "a", "None": "b"}));
    }

    #[test]
    fn test_trailing_commas() {
        assert_eq!(parse_python_literal("{'a': [1, 2,],}").unwrap(), json!({"a": [1, 2]}));
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(parse_python_literal("{'a': }").is_none());
        assert!(parse_python_literal("[1, 2").is_none());
        assert!(parse_python_literal("{'a': 1} extra").is_none());
        assert!(parse_python_literal("os.system('x')").is_none());
        assert!(parse_python_literal("").is_none());
    }
}
