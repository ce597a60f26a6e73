//! Small utility helpers used across modules.

/// Very small and safe string templating.
/// Replaces occurrences of `{key}` in the template with provided values.
/// Braces that don't name a key are left untouched, so code snippets
/// containing `{ ... }` blocks can be written as-is.
pub fn fill_template(tpl: &str, pairs: &[(&str, &str)]) -> String {
  let mut out = tpl.to_string();
  for (k, v) in pairs {
    let needle = format!("{{{}}}", k);
    out = out.replace(&needle, v);
  }
  out
}

/// Number of lines in a snippet, counting by `\n` separators.
pub fn line_count(code: &str) -> usize {
  code.split('\n').count()
}

/// 1-based line lookup.
pub fn line_at(code: &str, line: usize) -> Option<&str> {
  line.checked_sub(1).and_then(|idx| code.split('\n').nth(idx))
}

/// Log-safe truncation for large strings.
/// Avoids spamming logs with whole code snippets.
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
