use std::path::{Path, PathBuf};

use image::{Rgb, RgbImage, Rgba, RgbaImage};
use tempfile::TempDir;
use watermark_blend::{run_interactive, Error, LineInput, ScriptedInput};

fn base_pattern() -> RgbImage {
    RgbImage::from_fn(4, 4, |x, y| Rgb([x as u8 * 50, y as u8 * 50, 7]))
}

fn write_rgb(dir: &TempDir, name: &str, img: &RgbImage) -> String {
    let path = dir.path().join(name);
    img.save(&path).unwrap();
    path.to_string_lossy().into_owned()
}

fn write_rgba(dir: &TempDir, name: &str, img: &RgbaImage) -> String {
    let path = dir.path().join(name);
    img.save(&path).unwrap();
    path.to_string_lossy().into_owned()
}

fn out_path(dir: &TempDir, name: &str) -> PathBuf {
    dir.path().join(name)
}

fn read_rgb(path: &Path) -> RgbImage {
    image::open(path).unwrap().to_rgb8()
}

#[test]
fn single_red_square_at_one_one() {
    let dir = tempfile::tempdir().unwrap();
    let base = base_pattern();
    let base_path = write_rgb(&dir, "base.png", &base);
    let wm_path = write_rgb(&dir, "wm.png", &RgbImage::from_pixel(2, 2, Rgb([255, 0, 0])));
    let out = out_path(&dir, "out.png");

    let mut input = ScriptedInput::new([
        base_path,
        wm_path,
        "no".to_string(),
        "100".to_string(),
        "single".to_string(),
        "1 1".to_string(),
        out.to_string_lossy().into_owned(),
    ]);
    let written = run_interactive(&mut input).unwrap();
    assert_eq!(written, out);

    let result = read_rgb(&out);
    assert_eq!(result.dimensions(), (4, 4));
    for (x, y, px) in result.enumerate_pixels() {
        if (1..=2).contains(&x) && (1..=2).contains(&y) {
            assert_eq!(*px, Rgb([255, 0, 0]), "({x},{y})");
        } else {
            assert_eq!(px, base.get_pixel(x, y), "({x},{y})");
        }
    }
    assert_eq!(
        input.notices().last().unwrap(),
        &format!("The watermarked image {} has been created.", out.display())
    );
}

#[test]
fn zero_weight_grid_reproduces_base() {
    let dir = tempfile::tempdir().unwrap();
    let base = base_pattern();
    let base_path = write_rgb(&dir, "base.png", &base);
    let wm_path = write_rgb(&dir, "wm.png", &RgbImage::from_pixel(3, 1, Rgb([9, 9, 9])));
    let out = out_path(&dir, "out.png");

    let mut input = ScriptedInput::new([
        base_path,
        wm_path,
        "no".to_string(),
        "0".to_string(),
        "grid".to_string(),
        out.to_string_lossy().into_owned(),
    ]);
    run_interactive(&mut input).unwrap();
    assert_eq!(read_rgb(&out), base);
}

#[test]
fn alpha_watermark_tiles_where_opaque() {
    let dir = tempfile::tempdir().unwrap();
    let base_path = write_rgb(&dir, "base.png", &RgbImage::from_pixel(4, 2, Rgb([0, 0, 0])));
    let mut wm = RgbaImage::new(2, 1);
    wm.put_pixel(0, 0, Rgba([100, 100, 100, 255]));
    wm.put_pixel(1, 0, Rgba([100, 100, 100, 0]));
    let wm_path = write_rgba(&dir, "wm.png", &wm);
    let out = out_path(&dir, "out.png");

    let mut input = ScriptedInput::new([
        base_path,
        wm_path,
        "yes".to_string(),
        "100".to_string(),
        "grid".to_string(),
        out.to_string_lossy().into_owned(),
    ]);
    run_interactive(&mut input).unwrap();

    let result = read_rgb(&out);
    for y in 0..2 {
        assert_eq!(*result.get_pixel(0, y), Rgb([100, 100, 100]));
        assert_eq!(*result.get_pixel(1, y), Rgb([0, 0, 0]));
        assert_eq!(*result.get_pixel(2, y), Rgb([100, 100, 100]));
        assert_eq!(*result.get_pixel(3, y), Rgb([0, 0, 0]));
    }
}

#[test]
fn invalid_transparency_color_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let base_path = write_rgb(&dir, "base.png", &base_pattern());
    let wm_path = write_rgb(&dir, "wm.png", &RgbImage::new(2, 2));
    let out = out_path(&dir, "out.png");

    let mut input = ScriptedInput::new([
        base_path,
        wm_path,
        "yes".to_string(),
        "300 0 0".to_string(),
        "50".to_string(),
        "grid".to_string(),
        out.to_string_lossy().into_owned(),
    ]);
    let err = run_interactive(&mut input).unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
    assert_eq!(err.to_string(), "The transparency color input is invalid.");
    assert!(!out.exists());
}

#[test]
fn oversized_watermark_is_rejected_at_load() {
    let dir = tempfile::tempdir().unwrap();
    let base_path = write_rgb(&dir, "base.png", &RgbImage::new(2, 2));
    let wm_path = write_rgb(&dir, "wm.png", &RgbImage::new(3, 3));

    let mut input = ScriptedInput::new([base_path, wm_path]);
    let err = run_interactive(&mut input).unwrap_err();
    assert_eq!(err.to_string(), "The watermark's dimensions are larger.");
    assert_eq!(input.remaining(), 0);
    assert_eq!(input.prompts().len(), 2);
}

#[test]
fn console_session_prints_prompts_and_confirmation() {
    let dir = tempfile::tempdir().unwrap();
    let base_path = write_rgb(&dir, "base.png", &base_pattern());
    let wm_path = write_rgb(&dir, "wm.png", &RgbImage::from_pixel(2, 2, Rgb([1, 1, 1])));
    let out = out_path(&dir, "out.jpeg");

    let answers = format!(
        "{base_path}\n{wm_path}\nno\n50\nsingle\n2 2\n{}\n",
        out.display()
    );
    let mut console = Vec::new();
    run_interactive(LineInput::new(answers.as_bytes(), &mut console)).unwrap();

    let printed = String::from_utf8(console).unwrap();
    let lines: Vec<&str> = printed.lines().collect();
    let confirmation = format!("The watermarked image {} has been created.", out.display());
    assert_eq!(
        lines,
        [
            "Input the image filename:",
            "Input the watermark image filename:",
            "Do you want to set a transparency color?",
            "Input the watermark transparency percentage (Integer 0-100):",
            "Choose the position method (single, grid):",
            "Input the watermark position ([x 0-2] [y 0-2]):",
            "Input the output image filename (jpg or png extension):",
            "The output file extension isn't \"jpg\" or \"png\".",
            confirmation.as_str(),
        ]
    );
    assert!(out.exists());
}

#[test]
fn empty_watermark_file_fails_cleanly() {
    let dir = tempfile::tempdir().unwrap();
    let base_path = write_rgb(&dir, "base.png", &base_pattern());
    let wm_path = dir.path().join("wm.ppm");
    std::fs::write(&wm_path, b"P6\n0 0\n255\n").unwrap();
    let out = out_path(&dir, "out.png");

    let mut input = ScriptedInput::new([
        base_path,
        wm_path.to_string_lossy().into_owned(),
        "no".to_string(),
        "50".to_string(),
        "grid".to_string(),
        out.to_string_lossy().into_owned(),
    ]);
    let err = run_interactive(&mut input).unwrap_err();
    assert_eq!(err.to_string(), "The watermark is empty.");
    assert_eq!(input.prompts().len(), 2);
    assert!(!out.exists());
}

#[test]
fn unencodable_output_format_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let base_path = write_rgb(&dir, "base.png", &base_pattern());
    let wm_path = write_rgb(&dir, "wm.png", &RgbImage::new(2, 2));
    let out = out_path(&dir, "out.hdr");

    let mut input = ScriptedInput::new([
        base_path,
        wm_path,
        "no".to_string(),
        "50".to_string(),
        "grid".to_string(),
        out.to_string_lossy().into_owned(),
    ]);
    let err = run_interactive(&mut input).unwrap_err();
    assert!(matches!(err, Error::Image(_)));
    assert!(!out.exists());
    assert!(!input
        .notices()
        .iter()
        .any(|n| n.starts_with("The watermarked image")));
}
