//! Integration tests for the load -> style -> layout -> paint -> script ->
//! re-layout -> re-paint pipeline, covering a handful of the literal I/O
//! scenarios the document parsing and rendering design describes.

use std::io::Write as _;

use image::GenericImageView as _;
use wisp_browser::{Source, render};

fn render_file(html: &str, width: u32, height: u32) -> image::DynamicImage {
    let mut path = std::env::temp_dir();
    path.push(format!("wisp-pipeline-test-{:?}.html", std::thread::current().id()));
    let mut file = std::fs::File::create(&path).expect("create temp html file");
    file.write_all(html.as_bytes()).expect("write temp html file");
    drop(file);

    let png = render(&Source::File(&path), width as f32, height as f32).expect("render should succeed");
    std::fs::remove_file(&path).ok();

    image::load_from_memory(&png).expect("output should be a valid PNG")
}

#[test]
fn empty_html_renders_a_blank_viewport_sized_png() {
    let image = render_file("", 120, 80);
    assert_eq!(image.dimensions(), (120, 80));
    for (_, _, pixel) in image.pixels() {
        assert_eq!(pixel.0, [255, 255, 255, 255]);
    }
}

#[test]
fn a_styled_block_paints_its_background_color() {
    let html = r#"<html><body><div style="width: 40px; height: 40px; background-color: rgb(255, 0, 0);"></div></body></html>"#;
    let image = render_file(html, 100, 100);
    let pixel = image.get_pixel(10, 10);
    assert_eq!(pixel.0, [255, 0, 0, 255]);
    // Outside the div, the background stays white.
    let outside = image.get_pixel(90, 90);
    assert_eq!(outside.0, [255, 255, 255, 255]);
}

#[test]
fn a_script_mutating_style_is_reflected_in_the_final_paint() {
    let html = r#"<html><body>
        <div id="box" style="width: 40px; height: 40px; background-color: rgb(0, 0, 255);"></div>
        <script>document.getElementById("box").style.backgroundColor = "rgb(0, 255, 0)";</script>
    </body></html>"#;
    let image = render_file(html, 100, 100);
    let pixel = image.get_pixel(10, 10);
    assert_eq!(pixel.0, [0, 255, 0, 255]);
}

#[test]
fn a_script_assigning_inner_html_replaces_content_before_the_final_paint() {
    let html = r#"<html><body>
        <div id="box"></div>
        <script>
            document.getElementById("box").innerHTML =
                "<div style=\"width: 30px; height: 30px; background-color: rgb(255, 128, 0);\"></div>";
        </script>
    </body></html>"#;
    let image = render_file(html, 100, 100);
    let pixel = image.get_pixel(5, 5);
    assert_eq!(pixel.0, [255, 128, 0, 255]);
}
