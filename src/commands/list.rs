//! List posts from the active content source

use anyhow::Result;

use crate::content::ContentSource;
use crate::Paperboy;

pub async fn run(app: &Paperboy) -> Result<()> {
    let source = ContentSource::from_config(&app.config, &app.base_dir);
    let posts = source.list_posts().await?;

    println!("Posts ({}):", posts.len());
    for post in posts {
        println!(
            "  {} - {} [{}] ({})",
            post.published_on.format("%Y-%m-%d"),
            post.title,
            post.slug,
            post.reading_time,
        );
    }

    Ok(())
}
