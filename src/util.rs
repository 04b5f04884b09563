// ABOUTME: Utility functions for slugging and scaffolding new posts
// ABOUTME: Provides consistent file names for posts created locally

use crate::Post;

pub fn slugify(text: &str) -> String {
    slug::slugify(text)
}

/// A draft post with a slug derived from its title and an empty body.
pub fn scaffold_post(title: &str) -> Post {
    Post {
        title: title.trim().to_string(),
        slug: slugify(title),
        body: "\n".into(),
        ..Default::default()
    }
}

/// `<slug>.md`, or `untitled.md` when the title has nothing sluggable.
pub fn file_name_for(post: &Post) -> String {
    if post.slug.is_empty() {
        "untitled.md".into()
    } else {
        format!("{}.md", post.slug)
    }
}
