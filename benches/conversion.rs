//! Benchmarks for the module conversion pipeline.
//!
//! Run with: cargo bench

use criterion::{Criterion, criterion_group, criterion_main};

use cnxmd::xml::{parse_document, strip_namespaces};
use cnxmd::{ModuleSource, RenderOptions, assemble_module, convert_module};

const MODULE_XML: &str = include_str!("../tests/fixtures/physics/modules/m10002/index.cnxml");

/// A synthetic module with many sections, figures and cross-references.
fn large_module(sections: usize) -> String {
    let mut body = String::new();
    for i in 0..sections {
        body.push_str(&format!(
            r#"<section id="s{i}"><title>Section {i}</title>
<para>See <link target-id="f{i}"/> and <emphasis effect="italics">notes</emphasis>.</para>
<figure id="f{i}"><media alt="Figure {i}"><image src="../../media/f{i}.png"/></media><caption>Caption {i}</caption></figure>
<list><item>one</item><item>two<sup>2</sup></item></list>
<table><tgroup cols="2"><tbody><row><entry>a</entry><entry>b</entry></row></tbody></tgroup></table>
</section>"#
        ));
    }
    format!(
        r#"<document xmlns="http://cnx.rice.edu/cnxml" xmlns:md="http://cnx.rice.edu/mdml">
<title>Large</title><metadata><md:content-id>m1</md:content-id></metadata>
<content>{body}</content></document>"#
    )
}

fn bench_parse(c: &mut Criterion) {
    c.bench_function("parse_module", |b| {
        b.iter(|| parse_document(MODULE_XML).unwrap());
    });
}

fn bench_assemble(c: &mut Criterion) {
    let mut root = parse_document(&large_module(200)).unwrap();
    strip_namespaces(&mut root);

    c.bench_function("assemble_large_module", |b| {
        b.iter(|| assemble_module(&root));
    });
}

fn bench_convert(c: &mut Criterion) {
    let source = ModuleSource::new("large", large_module(200));
    let options = RenderOptions::default();

    c.bench_function("convert_large_module", |b| {
        b.iter(|| convert_module(&source, &options).unwrap());
    });
}

criterion_group!(benches, bench_parse, bench_assemble, bench_convert);
criterion_main!(benches);
