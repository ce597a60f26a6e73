//! Built-in hand-authored levels ("story mode").
//!
//! Ids are small and reserved: they must stay below `catalog::GENERATED_ID_OFFSET`.

use crate::domain::{Difficulty, Language, Level};

#[allow(clippy::too_many_arguments)]
fn lvl(
  id: u32,
  language: Language,
  difficulty: Difficulty,
  title: &str,
  description: &str,
  code: &str,
  bug_line: usize,
  solution: &str,
  explanation: &str,
) -> Level {
  Level {
    id,
    language,
    difficulty,
    title: title.into(),
    description: description.into(),
    code: code.into(),
    bug_line,
    solution: solution.into(),
    explanation: explanation.into(),
  }
}

/// Hand-authored levels in authored order.
pub fn seed_levels() -> Vec<Level> {
  use Difficulty::*;
  use Language::*;
  vec![
    // JavaScript (1-5)
    lvl(
      1, Javascript, Easy,
      "Basic Addition",
      "This function should add two numbers, but the output is weird.",
      "function add(a, b) {\n  return a + b\n}\n\nconst result = add(\"5\", 10); // Returns \"510\"",
      2,
      "return Number(a) + Number(b);",
      "The '+' operator concatenates if one operand is a string. You need to explicitly convert inputs to numbers.",
    ),
    lvl(
      2, Javascript, Easy,
      "Loop Limits",
      "We want to log items 0 through 4.",
      "const items = [1, 2, 3, 4, 5];\nfor (let i = 0; i <= items.length; i++) {\n  console.log(items[i]);\n}",
      2,
      "for (let i = 0; i < items.length; i++) {",
      "Array indices are 0-based. `<= items.length` tries to access an index that doesn't exist (undefined).",
    ),
    lvl(
      3, Javascript, Medium,
      "Async Confusion",
      "The data isn't loading correctly.",
      "async function fetchData() {\n  const data = fetch('https://api.example.com');\n  console.log(data.json());\n}",
      2,
      "const data = await fetch('https://api.example.com');",
      "fetch() returns a Promise. You must 'await' it to get the actual response object.",
    ),
    lvl(
      4, Javascript, Easy,
      "Object Equality",
      "Why are these two objects not equal?",
      "const obj1 = { id: 1 };\nconst obj2 = { id: 1 };\n\nif (obj1 === obj2) {\n  console.log('Match!');\n}",
      4,
      "if (obj1.id === obj2.id) {",
      "In JS, objects are compared by reference, not value. Two different objects with same content are not strict equal (===).",
    ),
    lvl(
      5, Javascript, Medium,
      "Closure Trap",
      "It prints 3 three times instead of 0, 1, 2.",
      "for (var i = 0; i < 3; i++) {\n  setTimeout(() => console.log(i), 100);\n}",
      1,
      "for (let i = 0; i < 3; i++) {",
      "'var' has function scope, sharing one 'i' variable. 'let' has block scope, creating a new 'i' for each iteration.",
    ),
    // Python (6-10)
    lvl(
      6, Python, Easy,
      "Indentation Error",
      "The function body seems detached.",
      "def greet(name):\nprint(f\"Hello, {name}\")",
      2,
      "  print(f\"Hello, {name}\")",
      "Python relies on indentation to define blocks. The print statement must be indented.",
    ),
    lvl(
      7, Python, Easy,
      "Mutable Default Args",
      "The list keeps growing across calls!",
      "def add_item(item, my_list=[]):\n  my_list.append(item)\n  return my_list",
      1,
      "def add_item(item, my_list=None):",
      "Default argument values are evaluated only once at definition time. A mutable default list is shared across all calls.",
    ),
    lvl(
      8, Python, Medium,
      "Dictionary Key",
      "Trying to use a list as a dictionary key.",
      "my_dict = {}\nmy_key = [1, 2, 3]\nmy_dict[my_key] = \"Value\"",
      3,
      "my_key = (1, 2, 3)",
      "Dictionary keys must be immutable (hashable). Lists are mutable; Tuples are immutable and can be keys.",
    ),
    lvl(
      9, Python, Easy,
      "String Concatenation",
      "Cannot add integer to string.",
      "age = 25\nmessage = \"I am \" + age + \" years old\"",
      2,
      "message = \"I am \" + str(age) + \" years old\"",
      "Python is strongly typed and does not implicitly convert integers to strings during concatenation.",
    ),
    lvl(
      10, Python, Medium,
      "Scope Shadowing",
      "Variable referenced before assignment.",
      "x = 10\ndef modify():\n  print(x)\n  x += 1",
      4,
      "  global x; x += 1",
      "By assigning to 'x' inside the function, Python treats 'x' as a local variable, but you tried to print it before assignment.",
    ),
    // HTML (66-68)
    lvl(
      66, Html, Easy,
      "Unclosed Tag",
      "The layout is broken below the title.",
      "<h1>Welcome</h1>\n<p>This is a paragraph\n<div>Content</div>",
      2,
      "<p>This is a paragraph</p>",
      "The <p> tag is not closed, which can cause rendering issues in some browsers or layouts.",
    ),
    lvl(
      67, Html, Easy,
      "Image Source",
      "The image is not showing up.",
      "<div class=\"card\">\n  <img srce=\"cat.jpg\" alt=\"A cute cat\" />\n</div>",
      2,
      "<img src=\"cat.jpg\" alt=\"A cute cat\" />",
      "The attribute for the image URL is 'src', not 'srce'.",
    ),
    lvl(
      68, Html, Medium,
      "ID Duplication",
      "JS selectors are behaving weirdly.",
      "<div id=\"header\">Top</div>\n<div id=\"content\">\n  <button id=\"header\">Click me</button>\n</div>",
      3,
      "<button id=\"btn-click\">Click me</button>",
      "IDs must be unique within a page. You cannot have two elements with id='header'.",
    ),
    // CSS (71-73)
    lvl(
      71, Css, Easy,
      "Missing Unit",
      "The box has no width.",
      ".box {\n  background: red;\n  width: 200;\n}",
      3,
      "width: 200px;",
      "CSS lengths (other than 0) require a unit (px, em, rem, etc.).",
    ),
    lvl(
      72, Css, Easy,
      "Wrong Property",
      "Text is not bold.",
      "p {\n  font-style: bold;\n  color: blue;\n}",
      2,
      "font-weight: bold;",
      "'font-style' is for italic/oblique. Use 'font-weight' for boldness.",
    ),
    lvl(
      73, Css, Easy,
      "Invalid Color",
      "The hex code looks wrong.",
      "body {\n  background-color: #ZZZZZZ;\n}",
      2,
      "background-color: #FFFFFF;",
      "Hex colors uses characters 0-9 and A-F. 'Z' is not a valid hex character.",
    ),
  ]
}
