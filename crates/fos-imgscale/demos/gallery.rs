//! Example: scale a small gallery and follow it through a resize
//!
//! `RUST_LOG=fos_imgscale=debug cargo run -p fos-imgscale --example gallery`

use std::time::Duration;

use anyhow::Result;
use fos_dom::{Document, NodeId};
use fos_imgscale::{ScaleConfig, attach};
use tracing_subscriber::EnvFilter;

const PHOTOS: [(&str, f64, f64); 3] = [
    ("panorama.jpg", 1600.0, 400.0),
    ("portrait.jpg", 600.0, 900.0),
    ("square.jpg", 500.0, 500.0),
];

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut doc = Document::new(1280.0, 720.0);
    let gallery = doc.create_element("ul");
    doc.append_child(doc.body(), gallery)?;
    doc.add_class(gallery, "gallery")?;

    let mut images = Vec::new();
    for (src, _, _) in PHOTOS {
        let item = doc.create_element("li");
        doc.append_child(gallery, item)?;
        doc.set_style(item, "width", "25%")?;
        doc.set_style(item, "height", "240px")?;
        let img = doc.create_image(src);
        doc.append_child(item, img)?;
        images.push(img);
    }

    let config = ScaleConfig::from_json(r#"{"scale": "fill", "fadeDurationMs": 200}"#)?;
    let handle = attach(&mut doc, ".gallery img", config);
    println!("fOS Image Scale v{}", fos_imgscale::VERSION);
    println!("{} image(s) waiting for load", handle.pending_loads());

    for (&img, (_, width, height)) in images.iter().zip(PHOTOS) {
        doc.finish_image_load(img, width, height)?;
    }
    doc.advance(Duration::from_millis(200));
    report(&doc, &images, "after load");

    doc.resize_viewport(640.0, 720.0);
    report(&doc, &images, "after resize to 640px");

    handle.detach(&mut doc);
    Ok(())
}

fn report(doc: &Document, images: &[NodeId], label: &str) {
    println!("\n{label}:");
    for &img in images {
        let src = doc.get_attribute(img, "src").unwrap_or("?");
        println!("  {src:<14} {:>12}  {}", doc.content_size(img).to_string(), doc.style_text(img));
    }
}
