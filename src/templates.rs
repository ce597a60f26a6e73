//! Bug template library: per-language recipes that synthesize leveled exercises.
//!
//! Each template is static data plus a generator `fn` that receives the random
//! source explicitly; generators never touch ambient randomness, so a seeded
//! `StdRng` reproduces the same snippet.
//!
//! Authoring contract: every generator returns a `bug_line` inside its own
//! `code`. The test module walks every template with many seeds to hold
//! authors to it.

use rand::seq::SliceRandom;
use rand::{Rng, RngCore};

use crate::domain::{Difficulty, Language};
use crate::util::fill_template;

/// Variable names substituted into generated snippets.
pub const VARS: [&str; 10] = [
  "x", "y", "count", "index", "total", "score", "limit", "value", "result", "temp",
];

/// Language whose templates serve any language without its own set.
pub const FALLBACK_LANGUAGE: Language = Language::Javascript;

/// Concrete output of one generator call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snippet {
  pub code: String,
  pub bug_line: usize,
  pub solution: String,
  pub explanation: String,
}

pub type GenerateFn = fn(&mut dyn RngCore) -> Snippet;

#[derive(Clone, Copy)]
pub struct BugTemplate {
  pub title: &'static str,
  pub description: &'static str,
  pub difficulty: Difficulty,
  pub generate: GenerateFn,
}

impl std::fmt::Debug for BugTemplate {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("BugTemplate")
      .field("title", &self.title)
      .field("difficulty", &self.difficulty)
      .finish()
  }
}

/// Where a language gets its templates from.
#[derive(Clone, Copy, Debug)]
pub enum TemplateSet {
  Own(&'static [BugTemplate]),
  /// No custom templates; serve `FALLBACK_LANGUAGE`'s.
  Fallback,
}

/// Exhaustive language → template table. Adding a language without an arm
/// here is a compile error.
pub fn template_set(language: Language) -> TemplateSet {
  match language {
    Language::Javascript => TemplateSet::Own(JS_TEMPLATES),
    Language::Typescript => TemplateSet::Own(TS_TEMPLATES),
    Language::Python => TemplateSet::Own(PY_TEMPLATES),
    Language::Cpp => TemplateSet::Own(CPP_TEMPLATES),
    Language::Java => TemplateSet::Own(JAVA_TEMPLATES),
    Language::Csharp => TemplateSet::Own(CSHARP_TEMPLATES),
    Language::Rust => TemplateSet::Own(RUST_TEMPLATES),
    Language::Go => TemplateSet::Own(GO_TEMPLATES),
    Language::Php => TemplateSet::Own(PHP_TEMPLATES),
    Language::Kotlin => TemplateSet::Own(KOTLIN_TEMPLATES),
    Language::Scala => TemplateSet::Own(SCALA_TEMPLATES),
    Language::Swift => TemplateSet::Own(SWIFT_TEMPLATES),
    Language::Ruby => TemplateSet::Own(RUBY_TEMPLATES),
    Language::Html => TemplateSet::Own(HTML_TEMPLATES),
    Language::Css => TemplateSet::Own(CSS_TEMPLATES),
  }
}

/// Follows the fallback rule: `Fallback` and an empty own set both resolve
/// to the fallback language's templates.
pub fn resolve(set: TemplateSet) -> &'static [BugTemplate] {
  match set {
    TemplateSet::Own(templates) if !templates.is_empty() => templates,
    _ => JS_TEMPLATES,
  }
}

pub fn templates_for(language: Language) -> &'static [BugTemplate] {
  resolve(template_set(language))
}

// -------- Generator helpers --------

fn pick_var(rng: &mut dyn RngCore) -> &'static str {
  VARS.choose(rng).copied().unwrap_or("x")
}

fn int_in(rng: &mut dyn RngCore, lo: i64, hi: i64) -> String {
  rng.gen_range(lo..=hi).to_string()
}

fn snippet(code: String, bug_line: usize, solution: String, explanation: &str) -> Snippet {
  Snippet { code, bug_line, solution, explanation: explanation.to_string() }
}

fn fixed(code: &str, bug_line: usize, solution: &str, explanation: &str) -> Snippet {
  snippet(code.to_string(), bug_line, solution.to_string(), explanation)
}

// -------- JavaScript --------

static JS_TEMPLATES: &[BugTemplate] = &[
  BugTemplate { title: "String Math", description: "Addition behaving strangely.", difficulty: Difficulty::Easy, generate: js_string_math },
  BugTemplate { title: "Const Reassignment", description: "Cannot update variable.", difficulty: Difficulty::Easy, generate: js_const_reassign },
  BugTemplate { title: "Off By One", description: "Loop runs too many times.", difficulty: Difficulty::Easy, generate: js_off_by_one },
];

fn js_string_math(rng: &mut dyn RngCore) -> Snippet {
  let v = pick_var(rng);
  let n = int_in(rng, 10, 99);
  let p = [("v", v), ("n", n.as_str())];
  snippet(
    fill_template("const {v} = \"{n}\";\nconst res = {v} + 10;\nconsole.log(res); // Prints \"{n}10\"", &p),
    2,
    fill_template("const res = Number({v}) + 10;", &p),
    "Adding a number to a string results in concatenation.",
  )
}

fn js_const_reassign(rng: &mut dyn RngCore) -> Snippet {
  let v = pick_var(rng);
  let a = int_in(rng, 1, 10);
  let b = int_in(rng, 11, 20);
  let p = [("v", v), ("a", a.as_str()), ("b", b.as_str())];
  snippet(
    fill_template("const {v} = {a};\n{v} = {b};", &p),
    2,
    fill_template("{v} = {b}; // Change const to let", &p),
    "Variables declared with 'const' cannot be reassigned. Use 'let'.",
  )
}

fn js_off_by_one(_rng: &mut dyn RngCore) -> Snippet {
  fixed(
    "const arr = [1, 2, 3];\nfor(let i=0; i<=arr.length; i++) {\n  console.log(arr[i]);\n}",
    2,
    "for(let i=0; i<arr.length; i++) {",
    "Arrays are 0-indexed. Condition should be i < arr.length.",
  )
}

// -------- TypeScript --------

static TS_TEMPLATES: &[BugTemplate] = &[
  BugTemplate { title: "Type Mismatch", description: "Type error on assignment.", difficulty: Difficulty::Easy, generate: ts_type_mismatch },
  BugTemplate { title: "Optional Property", description: "Object is possibly undefined.", difficulty: Difficulty::Medium, generate: ts_optional_property },
];

fn ts_type_mismatch(rng: &mut dyn RngCore) -> Snippet {
  let v = pick_var(rng);
  let a = int_in(rng, 1, 10);
  let b = int_in(rng, 11, 20);
  let p = [("v", v), ("a", a.as_str()), ("b", b.as_str())];
  snippet(
    fill_template("let {v}: number = {a};\n{v} = \"hello\";", &p),
    2,
    fill_template("{v} = {b};", &p),
    "Cannot assign type 'string' to type 'number'.",
  )
}

fn ts_optional_property(_rng: &mut dyn RngCore) -> Snippet {
  fixed(
    "interface Data { val?: string }\nfunction print(d: Data) {\n  console.log(d.val.length);\n}",
    3,
    "console.log(d.val?.length);",
    "Property 'val' is optional. Use optional chaining (?.) to access it safely.",
  )
}

// -------- Python --------

static PY_TEMPLATES: &[BugTemplate] = &[
  BugTemplate { title: "String Concat", description: "TypeError: can only concatenate str to str.", difficulty: Difficulty::Easy, generate: py_string_concat },
  BugTemplate { title: "Indentation", description: "SyntaxError: unexpected indent.", difficulty: Difficulty::Easy, generate: py_indentation },
  BugTemplate { title: "Mutable Default", description: "List keeps growing.", difficulty: Difficulty::Medium, generate: py_mutable_default },
];

fn py_string_concat(rng: &mut dyn RngCore) -> Snippet {
  let v = pick_var(rng);
  let n = int_in(rng, 1, 10);
  let p = [("v", v), ("n", n.as_str())];
  snippet(
    fill_template("{v} = {n}\nprint(\"Value: \" + {v})", &p),
    2,
    fill_template("print(\"Value: \" + str({v}))", &p),
    "Python is strongly typed. You must explicitly convert numbers to strings.",
  )
}

fn py_indentation(_rng: &mut dyn RngCore) -> Snippet {
  fixed(
    "def run():\nprint(\"Running\")",
    2,
    "  print(\"Running\")",
    "Python relies on indentation. The function body must be indented.",
  )
}

fn py_mutable_default(_rng: &mut dyn RngCore) -> Snippet {
  fixed(
    "def add(x, l=[]):\n  l.append(x)\n  return l",
    1,
    "def add(x, l=None):",
    "Do not use mutable objects as default arguments.",
  )
}

// -------- C++ --------

static CPP_TEMPLATES: &[BugTemplate] = &[
  BugTemplate { title: "Missing Semicolon", description: "Syntax error.", difficulty: Difficulty::Easy, generate: cpp_missing_semicolon },
  BugTemplate { title: "Integer Division", description: "Result is 0.", difficulty: Difficulty::Medium, generate: cpp_integer_division },
];

fn cpp_missing_semicolon(rng: &mut dyn RngCore) -> Snippet {
  let v = pick_var(rng);
  let n = int_in(rng, 1, 100);
  let p = [("v", v), ("n", n.as_str())];
  snippet(
    fill_template("int main() {\n  int {v} = {n}\n  return 0;\n}", &p),
    2,
    fill_template("int {v} = {n};", &p),
    "Statements in C++ must end with a semicolon.",
  )
}

fn cpp_integer_division(_rng: &mut dyn RngCore) -> Snippet {
  fixed(
    "double res = 1 / 2;\nstd::cout << res;",
    1,
    "double res = 1.0 / 2.0;",
    "Integer division truncates decimals.",
  )
}

// -------- Java --------

static JAVA_TEMPLATES: &[BugTemplate] = &[
  BugTemplate { title: "String Compare", description: "Comparison failed.", difficulty: Difficulty::Easy, generate: java_string_compare },
  BugTemplate { title: "Null Pointer", description: "Crash on null.", difficulty: Difficulty::Medium, generate: java_null_pointer },
];

fn java_string_compare(_rng: &mut dyn RngCore) -> Snippet {
  fixed(
    "String a = new String(\"test\");\nif (a == \"test\") {\n  System.out.println(\"Match\");\n}",
    2,
    "if (a.equals(\"test\")) {",
    "Use .equals() for value comparison in Java, not ==.",
  )
}

fn java_null_pointer(_rng: &mut dyn RngCore) -> Snippet {
  fixed(
    "String s = null;\nSystem.out.println(s.length());",
    2,
    "if (s != null) System.out.println(s.length());",
    "Cannot call method on null object.",
  )
}

// -------- C# --------

static CSHARP_TEMPLATES: &[BugTemplate] = &[
  BugTemplate { title: "Case Sensitivity", description: "Method not found.", difficulty: Difficulty::Easy, generate: cs_case_sensitivity },
  BugTemplate { title: "Null Check", description: "Object is null.", difficulty: Difficulty::Medium, generate: cs_null_check },
];

fn cs_case_sensitivity(_rng: &mut dyn RngCore) -> Snippet {
  fixed(
    "Console.writeline(\"Hello\");",
    1,
    "Console.WriteLine(\"Hello\");",
    "C# is case sensitive. Use WriteLine.",
  )
}

fn cs_null_check(_rng: &mut dyn RngCore) -> Snippet {
  fixed(
    "string s = null;\nint l = s.Length;",
    2,
    "int? l = s?.Length;",
    "Use null conditional operator (?.).",
  )
}

// -------- Rust --------

static RUST_TEMPLATES: &[BugTemplate] = &[
  BugTemplate { title: "Immutability", description: "Cannot assign twice.", difficulty: Difficulty::Easy, generate: rust_immutability },
  BugTemplate { title: "Ownership", description: "Value moved.", difficulty: Difficulty::Medium, generate: rust_ownership },
];

fn rust_immutability(rng: &mut dyn RngCore) -> Snippet {
  let v = pick_var(rng);
  let p = [("v", v)];
  snippet(
    fill_template("let {v} = 10;\n{v} = 20;", &p),
    1,
    fill_template("let mut {v} = 10;", &p),
    "Variables are immutable by default in Rust.",
  )
}

fn rust_ownership(_rng: &mut dyn RngCore) -> Snippet {
  fixed(
    "let s1 = String::from(\"hi\");\nlet s2 = s1;\nprintln!(\"{}\", s1);",
    3,
    "println!(\"{}\", s2);",
    "s1 was moved to s2. s1 is invalid.",
  )
}

// -------- Go --------

static GO_TEMPLATES: &[BugTemplate] = &[
  BugTemplate { title: "Unused Var", description: "Compile error.", difficulty: Difficulty::Easy, generate: go_unused_var },
  BugTemplate { title: "Assignment", description: "Syntax error.", difficulty: Difficulty::Easy, generate: go_assignment },
];

fn go_unused_var(rng: &mut dyn RngCore) -> Snippet {
  let v = pick_var(rng);
  let p = [("v", v)];
  snippet(
    fill_template("func main() {\n  {v} := 10\n}", &p),
    2,
    fill_template("_ = {v}", &p),
    "Go does not allow unused variables.",
  )
}

fn go_assignment(rng: &mut dyn RngCore) -> Snippet {
  let v = pick_var(rng);
  let p = [("v", v)];
  snippet(
    fill_template("{v} := 10\n{v} := 20", &p),
    2,
    fill_template("{v} = 20", &p),
    "Use = for assignment, := is for declaration.",
  )
}

// -------- PHP --------

static PHP_TEMPLATES: &[BugTemplate] = &[
  BugTemplate { title: "Missing Sigil", description: "Parse error.", difficulty: Difficulty::Easy, generate: php_missing_sigil },
  BugTemplate { title: "Concat", description: "Math instead of string.", difficulty: Difficulty::Easy, generate: php_concat },
];

fn php_missing_sigil(rng: &mut dyn RngCore) -> Snippet {
  let v = pick_var(rng);
  let p = [("v", v)];
  snippet(
    fill_template("{v} = 10;\necho {v};", &p),
    1,
    fill_template("${v} = 10;", &p),
    "Variables in PHP must start with $.",
  )
}

fn php_concat(_rng: &mut dyn RngCore) -> Snippet {
  fixed(
    "$a = \"Hello \" + \"World\";",
    1,
    "$a = \"Hello \" . \"World\";",
    "PHP uses . for concatenation, not +.",
  )
}

// -------- Kotlin --------

static KOTLIN_TEMPLATES: &[BugTemplate] = &[
  BugTemplate { title: "Val Reassign", description: "Val cannot be reassigned.", difficulty: Difficulty::Easy, generate: kotlin_val_reassign },
  BugTemplate { title: "Null Safety", description: "Type mismatch.", difficulty: Difficulty::Easy, generate: kotlin_null_safety },
];

fn kotlin_val_reassign(rng: &mut dyn RngCore) -> Snippet {
  let v = pick_var(rng);
  let p = [("v", v)];
  snippet(
    fill_template("val {v} = 5\n{v} = 10", &p),
    2,
    fill_template("var {v} = 5", &p),
    "Use var for mutable variables.",
  )
}

fn kotlin_null_safety(rng: &mut dyn RngCore) -> Snippet {
  let v = pick_var(rng);
  let p = [("v", v)];
  snippet(
    fill_template("var {v}: String = null", &p),
    1,
    fill_template("var {v}: String? = null", &p),
    "Non-nullable types cannot hold null.",
  )
}

// -------- Scala --------

static SCALA_TEMPLATES: &[BugTemplate] = &[
  BugTemplate { title: "Val Reassign", description: "Reassignment to val.", difficulty: Difficulty::Easy, generate: scala_val_reassign },
  BugTemplate { title: "List Add", description: "Immutable list.", difficulty: Difficulty::Medium, generate: scala_list_add },
];

fn scala_val_reassign(rng: &mut dyn RngCore) -> Snippet {
  let v = pick_var(rng);
  let p = [("v", v)];
  snippet(
    fill_template("val {v} = 1\n{v} = 2", &p),
    2,
    fill_template("var {v} = 1", &p),
    "Use var for mutable variables.",
  )
}

fn scala_list_add(_rng: &mut dyn RngCore) -> Snippet {
  fixed(
    "val l = List(1,2)\nl += 3",
    2,
    "val l2 = l :+ 3",
    "List is immutable. Create a new list.",
  )
}

// -------- Swift --------

static SWIFT_TEMPLATES: &[BugTemplate] = &[
  BugTemplate { title: "Force Unwrap", description: "Fatal error.", difficulty: Difficulty::Easy, generate: swift_force_unwrap },
  BugTemplate { title: "Let Reassign", description: "Constant mutation.", difficulty: Difficulty::Easy, generate: swift_let_reassign },
];

fn swift_force_unwrap(_rng: &mut dyn RngCore) -> Snippet {
  fixed(
    "var s: String? = nil\nprint(s!)",
    2,
    "if let v = s { print(v) }",
    "Force unwrapping nil causes a crash.",
  )
}

fn swift_let_reassign(rng: &mut dyn RngCore) -> Snippet {
  let v = pick_var(rng);
  let p = [("v", v)];
  snippet(
    fill_template("let {v} = 10\n{v} = 20", &p),
    2,
    fill_template("var {v} = 10", &p),
    "Use var for variables that change.",
  )
}

// -------- Ruby --------

static RUBY_TEMPLATES: &[BugTemplate] = &[
  BugTemplate { title: "Concat", description: "Type error.", difficulty: Difficulty::Easy, generate: ruby_concat },
  BugTemplate { title: "Missing End", description: "Syntax error.", difficulty: Difficulty::Easy, generate: ruby_missing_end },
];

fn ruby_concat(rng: &mut dyn RngCore) -> Snippet {
  let age = int_in(rng, 18, 65);
  let p = [("n", age.as_str())];
  snippet(
    fill_template("puts \"Age: \" + {n}", &p),
    1,
    fill_template("puts \"Age: \" + {n}.to_s", &p),
    "Explicitly convert numbers to string.",
  )
}

fn ruby_missing_end(_rng: &mut dyn RngCore) -> Snippet {
  fixed(
    "if true\n  puts \"ok\"",
    2,
    "end",
    "Blocks must be closed with end.",
  )
}

// -------- HTML --------

static HTML_TEMPLATES: &[BugTemplate] = &[
  BugTemplate { title: "Unclosed Tag", description: "Breaking the layout.", difficulty: Difficulty::Easy, generate: html_unclosed_tag },
  BugTemplate { title: "Invalid Attribute", description: "Link not working.", difficulty: Difficulty::Easy, generate: html_invalid_attribute },
];

fn html_unclosed_tag(_rng: &mut dyn RngCore) -> Snippet {
  fixed(
    "<div>\n  <p>Hello World\n</div>",
    2,
    "  <p>Hello World</p>",
    "Paragraph tag <p> must be closed with </p>.",
  )
}

fn html_invalid_attribute(_rng: &mut dyn RngCore) -> Snippet {
  fixed(
    "<a href=\"https://example.com\">\n  Link\n</a href>",
    3,
    "</a>",
    "Closing tags do not contain attributes. Just use </a>.",
  )
}

// -------- CSS --------

static CSS_TEMPLATES: &[BugTemplate] = &[
  BugTemplate { title: "Missing Unit", description: "Layout ignored.", difficulty: Difficulty::Easy, generate: css_missing_unit },
  BugTemplate { title: "Invalid Property", description: "Text color not changing.", difficulty: Difficulty::Easy, generate: css_invalid_property },
];

fn css_missing_unit(rng: &mut dyn RngCore) -> Snippet {
  let w = int_in(rng, 50, 400);
  let p = [("w", w.as_str())];
  snippet(
    fill_template(".box {\n  width: {w};\n  height: 100px;\n}", &p),
    2,
    fill_template("  width: {w}px;", &p),
    "Non-zero values in CSS must have a unit (e.g., px, em, %).",
  )
}

fn css_invalid_property(_rng: &mut dyn RngCore) -> Snippet {
  fixed(
    ".text {\n  text-color: red;\n}",
    2,
    "  color: red;",
    "The property to change text color is 'color', not 'text-color'.",
  )
}
