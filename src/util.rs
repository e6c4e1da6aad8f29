//! Small utility helpers used across modules.

use serde_json::Value;

/// Very small and safe string templating.
/// Replaces occurrences of `{key}` in the template with provided values.
/// This is intentionally simple (no nested/conditional logic).
pub fn fill_template(tpl: &str, pairs: &[(&str, &str)]) -> String {
  let mut out = tpl.to_string();
  for (k, v) in pairs {
    let needle = format!("{{{}}}", k);
    out = out.replace(&needle, v);
  }
  out
}

/// Log-safe truncation for large strings.
/// Avoids spamming logs with huge request/response payloads.
pub fn trunc_for_log(s: &str, max: usize) -> String {
  if s.len() <= max {
    return s.to_string();
  }
  let mut cut = max;
  while !s.is_char_boundary(cut) {
    cut -= 1;
  }
  format!("{}… ({} bytes total)", &s[..cut], s.len())
}

/// Lowercase ASCII slug for file names: alphanumerics kept, every other run
/// collapsed into a single `-`.
pub fn slugify(s: &str) -> String {
  let mut out = String::with_capacity(s.len());
  let mut pending_dash = false;
  for ch in s.chars() {
    if ch.is_ascii_alphanumeric() {
      if pending_dash && !out.is_empty() {
        out.push('-');
      }
      pending_dash = false;
      out.push(ch.to_ascii_lowercase());
    } else {
      pending_dash = true;
    }
  }
  out
}

/// Remove a wrapping Markdown code fence (```json ... ```), if present.
pub fn strip_code_fence(text: &str) -> &str {
  let t = text.trim();
  if !t.starts_with("```") {
    return t;
  }
  let body = match t.find('\n') {
    Some(nl) => &t[nl + 1..],
    None => return t.trim_start_matches('`').trim(),
  };
  body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

fn strip_control_chars(text: &str) -> String {
  text.chars().filter(|c| !c.is_control() || matches!(c, '\n' | '\r' | '\t')).collect()
}

/// Drop commas that directly precede a closing `}` or `]`, outside strings.
fn strip_trailing_commas(text: &str) -> String {
  let chars: Vec<char> = text.chars().collect();
  let mut out = String::with_capacity(text.len());
  let mut in_string = false;
  let mut escaped = false;

  for (i, &ch) in chars.iter().enumerate() {
    if in_string {
      out.push(ch);
      if escaped {
        escaped = false;
      } else if ch == '\\' {
        escaped = true;
      } else if ch == '"' {
        in_string = false;
      }
      continue;
    }
    if ch == '"' {
      in_string = true;
    } else if ch == ',' {
      let next = chars[i + 1..].iter().find(|c| !c.is_whitespace());
      if matches!(next, Some('}') | Some(']')) {
        continue;
      }
    }
    out.push(ch);
  }
  out
}

/// First balanced `{...}` object in the text, honouring strings and escapes.
fn first_object(text: &str) -> Option<&str> {
  let start = text.find('{')?;
  let mut depth = 0usize;
  let mut in_string = false;
  let mut escaped = false;

  for (off, ch) in text[start..].char_indices() {
    if escaped {
      escaped = false;
      continue;
    }
    match ch {
      '\\' if in_string => escaped = true,
      '"' => in_string = !in_string,
      '{' if !in_string => depth += 1,
      '}' if !in_string => {
        depth -= 1;
        if depth == 0 {
          return Some(&text[start..start + off + 1]);
        }
      }
      _ => {}
    }
  }
  None
}

/// Recover a JSON value from model output.
///
/// Attempts, in order: the text as-is (after removing a code fence), without
/// control characters, without trailing commas, and finally the first
/// balanced object embedded in surrounding prose.
pub fn extract_json(text: &str) -> Result<Value, String> {
  let text = strip_code_fence(text);
  let first_err = match serde_json::from_str::<Value>(text) {
    Ok(v) => return Ok(v),
    Err(e) => e,
  };

  let cleaned = strip_control_chars(text);
  if let Ok(v) = serde_json::from_str::<Value>(&cleaned) {
    return Ok(v);
  }

  let no_commas = strip_trailing_commas(&cleaned);
  if let Ok(v) = serde_json::from_str::<Value>(&no_commas) {
    return Ok(v);
  }

  if let Some(obj) = first_object(&no_commas) {
    if let Ok(v) = serde_json::from_str::<Value>(obj) {
      return Ok(v);
    }
  }

  Err(format!("no JSON object recoverable ({first_err}); preview: {}", trunc_for_log(text, 120)))
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn template_fills_all_occurrences() {
    let out = fill_template("{a} and {b} and {a}", &[("a", "1"), ("b", "2")]);
    assert_eq!(out, "1 and 2 and 1");
  }

  #[test]
  fn slug_collapses_separators() {
    assert_eq!(slugify("BOOT-001"), "boot-001");
    assert_eq!(slugify("  Full Stack // Web  Dev! "), "full-stack-web-dev");
    assert_eq!(slugify("Kelas Lanjutan"), "kelas-lanjutan");
    assert_eq!(slugify("***"), "");
  }

  #[test]
  fn trunc_respects_char_boundaries() {
    let s = "ééééé";
    let t = trunc_for_log(s, 3);
    assert!(t.starts_with('é'));
    assert!(t.ends_with("(10 bytes total)"));
    assert_eq!(trunc_for_log("short", 10), "short");
  }

  #[test]
  fn plain_json_parses() {
    assert_eq!(extract_json(r#"{"a": 1}"#).unwrap(), json!({"a": 1}));
  }

  #[test]
  fn fenced_json_parses() {
    let text = "```json\n{\"a\": [1, 2]}\n```";
    assert_eq!(extract_json(text).unwrap(), json!({"a": [1, 2]}));
    assert_eq!(extract_json("```\n{}\n```").unwrap(), json!({}));
  }

  #[test]
  fn control_characters_are_dropped() {
    let text = "{\"a\": \"x\u{0001}y\"}";
    assert_eq!(extract_json(text).unwrap(), json!({"a": "xy"}));
  }

  #[test]
  fn trailing_commas_are_removed_outside_strings() {
    let text = r#"{"a": [1, 2,], "b": "keep ,]", }"#;
    assert_eq!(extract_json(text).unwrap(), json!({"a": [1, 2], "b": "keep ,]"}));
  }

  #[test]
  fn object_is_extracted_from_prose() {
    let text = r#"Here is your curriculum: {"name": "x {not a brace}", "n": {"m": "\"}"}} Enjoy!"#;
    assert_eq!(extract_json(text).unwrap(), json!({"name": "x {not a brace}", "n": {"m": "\"}"}}));
  }

  #[test]
  fn hopeless_text_is_an_error() {
    let err = extract_json("sorry, I cannot help with that").unwrap_err();
    assert!(err.contains("no JSON object"));
    assert!(extract_json("{\"a\": ").is_err());
  }
}
