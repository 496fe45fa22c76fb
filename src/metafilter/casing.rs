//! Identifier casing and dotted-name transforms.
//!
//! All functions are total: any input produces an output, and applying a casing
//! transform to its own output changes nothing.

/// Uppercases the first character, keeping the rest as is.
pub fn upper_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Lowercases the first character, keeping the rest as is.
pub fn lower_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Capitalizes a single word: first character uppercased, the rest lowercased.
fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Joins space separated words into one capitalized run: `"hello big world"` -> `"HelloBigWorld"`.
fn join_capitalized(s: &str) -> String {
    s.split(' ').map(capitalize).collect()
}

/// `"Hello World"` -> `"helloWorld"`, `"FooBar"` -> `"fooBar"`.
pub fn camel_cased(s: &str) -> String {
    if s.contains(' ') {
        lower_first(&join_capitalized(s))
    } else {
        lower_first(s)
    }
}

/// `"hello world"` -> `"HelloWorld"`, `"fooBar"` -> `"FooBar"`.
pub fn pascal_cased(s: &str) -> String {
    if s.contains(' ') {
        join_capitalized(s)
    } else {
        upper_first(s)
    }
}

/// `"HelloWorld"` -> `"hello_world"`, `"hello world"` -> `"hello_world"`.
///
/// An underscore goes before each uppercase letter unless it starts the string or already
/// follows an underscore, so `"Foo_Bar"` stays `"foo_bar"`.
pub fn snake_cased(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 4);
    for c in s.chars() {
        if c == ' ' {
            out.push('_');
        } else if c.is_uppercase() {
            if !out.is_empty() && !out.ends_with('_') {
                out.push('_');
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// `"foo.bar.baz"` -> `"fooBarBaz"`. Empty segments (`"a..b"`) are skipped.
pub fn dotted_name_to_camel_cased(s: &str) -> String {
    let joined: String = s
        .split('.')
        .filter(|segment| !segment.is_empty())
        .map(pascal_cased)
        .collect();
    camel_cased(&joined)
}

/// `"a.b.c"` -> `"abc"`.
pub fn undotted(s: &str) -> String {
    s.replace('.', "")
}
