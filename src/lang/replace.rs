/// Substitutes `:name` placeholders in a message template.
///
/// Each replacement also matches its capitalised (`:Name`) and upper-case
/// (`:NAME`) spelling, with the value transformed the same way. The template
/// is scanned once, trying the longest placeholder first, so a substituted
/// value is never itself re-expanded.
pub fn make_replacements(line: &str, replace: &[(&str, &str)]) -> String {
    if replace.is_empty() {
        return line.to_owned();
    }

    let mut pairs: Vec<(String, String)> = Vec::with_capacity(replace.len() * 3);
    for (key, value) in replace {
        push_pair(&mut pairs, format!(":{}", ucfirst(key)), ucfirst(value));
        push_pair(&mut pairs, format!(":{}", key.to_uppercase()), value.to_uppercase());
        push_pair(&mut pairs, format!(":{key}"), (*value).to_owned());
    }
    pairs.sort_by(|a, b| b.0.len().cmp(&a.0.len()));

    let mut out = String::with_capacity(line.len());
    let mut rest = line;
    while let Some(pos) = rest.find(':') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];
        match pairs.iter().find(|(placeholder, _)| tail.starts_with(placeholder.as_str())) {
            Some((placeholder, value)) => {
                out.push_str(value);
                rest = &tail[placeholder.len()..];
            }
            None => {
                out.push(':');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

// A later spelling of the same placeholder replaces the earlier one.
fn push_pair(pairs: &mut Vec<(String, String)>, placeholder: String, value: String) {
    match pairs.iter_mut().find(|(existing, _)| *existing == placeholder) {
        Some(slot) => slot.1 = value,
        None => pairs.push((placeholder, value)),
    }
}

fn ucfirst(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
