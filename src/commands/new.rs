//! Create a new local post file

use anyhow::Result;
use chrono::Utc;

use crate::content::publish::NewPost;
use crate::content::LocalStore;
use crate::Paperboy;

/// Scaffold a post in the local content directory. The CMS backend is
/// never written from the CLI; remote posts go through the admin API.
pub fn create_post(app: &Paperboy, title: &str, slug: Option<&str>) -> Result<()> {
    let slug = match slug {
        Some(s) => s.to_string(),
        None => slug::slugify(title),
    };

    let draft = NewPost {
        title: title.to_string(),
        slug: slug.clone(),
        abstract_: String::new(),
        body: String::new(),
        category: None,
        tags: Vec::new(),
        published_on: Utc::now(),
    };

    let store = LocalStore::new(&app.content_dir);
    store.create_post(&draft)?;

    println!("Created: {}/{}.mdx", app.content_dir.display(), slug);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_scaffold_has_header() {
        let dir = tempdir().unwrap();
        let app = Paperboy::new(dir.path()).unwrap();

        create_post(&app, "My Fancy Title", None).unwrap();

        let path = app.content_dir.join("my-fancy-title.mdx");
        let content = std::fs::read_to_string(path).unwrap();
        assert!(content.starts_with("---\n"));
        assert!(content.contains("title: My Fancy Title"));
        assert!(content.contains("publishedOn:"));
    }
}
