//! Parses a small document and pretty-prints the recovered tree, one
//! element per line with its attributes, content, and children indented.
//!
//! Run with: cargo run --example print_tree

use xmlgrove::{Document, NodeId};

const SAMPLE: &str = r#"<?xml version="1.0"?>
<library>
  <book id="1" lang="en">
    <title>Systems Programming</title>
    <pages>412</pages>
  </book>
  <book id="2" lang="de">
    <title>Der Steppenwolf</title>
  </book>
</library>"#;

fn print_node(doc: &Document, id: NodeId, indent: usize) {
    let pad = "  ".repeat(indent);
    print!("{pad}\"{}\" (", doc.name_str(id));
    let mut first = true;
    for attr_id in doc.attributes(id) {
        if !first {
            print!(" ");
        }
        print!("{}={}", doc.attr_key_str(attr_id), doc.attr_value_str(attr_id));
        first = false;
    }
    println!(")");
    if !doc.content(id).is_empty() {
        println!("{pad}  content: {}", doc.content_str(id));
    }
    for child in doc.children(id) {
        print_node(doc, child, indent + 1);
    }
}

fn main() {
    tracing_subscriber::fmt::init();

    let doc = Document::parse(SAMPLE.as_bytes());
    if let Some(err) = doc.error() {
        eprintln!("parse error: {err}");
    }
    match doc.root() {
        Some(root) => print_node(&doc, root, 0),
        None => eprintln!("no root element"),
    }
}
