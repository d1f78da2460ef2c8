//! Naming conventions
//!
//! Case conversion goes through `heck`; inflection goes through
//! `Inflector`, always on lower-case snake input so that only the final
//! word of a compound name is inflected ("blog_post" -> "blog_posts").

use heck::{ToLowerCamelCase, ToSnakeCase, ToUpperCamelCase};
use inflector::string::pluralize::to_plural;
use inflector::string::singularize::to_singular;

/// `BlogPost` / `blog post` -> `blog_post`
pub fn snake(input: &str) -> String {
    input.to_snake_case()
}

/// `blog_post` -> `BlogPost`
pub fn studly(input: &str) -> String {
    input.to_upper_camel_case()
}

/// `blog_post` -> `blogPost`
pub fn camel(input: &str) -> String {
    input.to_lower_camel_case()
}

/// Pluralize the last word, returning snake_case
pub fn plural(input: &str) -> String {
    inflect_last_word(&snake(input), to_plural)
}

/// Singularize the last word, returning snake_case
pub fn singular(input: &str) -> String {
    inflect_last_word(&snake(input), to_singular)
}

/// Class name for an entity: singular, StudlyCase
pub fn model_name(name: &str) -> String {
    studly(&singular(name))
}

/// Table name for an entity: plural, snake_case
pub fn table_name(name: &str) -> String {
    plural(name)
}

/// Default foreign key pointing at an entity: `user_id`
pub fn foreign_key(name: &str) -> String {
    format!("{}_id", singular(name))
}

fn inflect_last_word(snake: &str, inflect: fn(&str) -> String) -> String {
    if snake.is_empty() {
        return String::new();
    }
    match snake.rsplit_once('_') {
        Some((head, last)) if !last.is_empty() => format!("{}_{}", head, inflect(last)),
        _ => inflect(snake),
    }
}

// ============================================================================
// Tests
// ============================================================================
