/// Display title for an error class with no dedicated message.
///
/// Splits before each upper-case letter and title-cases every word:
/// `UnprocessableEntityHttpException` becomes
/// `Unprocessable Entity Http Exception`.
pub fn title_from_class(class_name: &str) -> String {
    let mut snake = String::with_capacity(class_name.len() + 8);
    for (i, c) in class_name.chars().enumerate() {
        if i > 0 && c.is_uppercase() {
            snake.push(' ');
        }
        snake.extend(c.to_lowercase());
    }

    snake
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("UnprocessableEntityHttpException", "Unprocessable Entity Http Exception")]
    #[case("QueryException", "Query Exception")]
    #[case("BadRequestHttpException", "Bad Request Http Exception")]
    #[case("IOError", "I O Error")]
    #[case("timeout", "Timeout")]
    fn titles_class_names(#[case] class_name: &str, #[case] expected: &str) {
        assert_eq!(title_from_class(class_name), expected);
    }
}
