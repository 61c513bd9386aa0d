use std::io::{BufRead, Write};

use crate::{Color, Framebuffer};

#[derive(Debug, thiserror::Error)]
pub enum PpmError {
    #[error("not a P3 image, found magic {0:?}")]
    BadMagic(String),
    #[error("unexpected end of image data while reading {0}")]
    Truncated(&'static str),
    #[error("invalid {what}: {value:?}")]
    InvalidNumber { what: &'static str, value: String },
    #[error("max value must be in 1..=65535, got {0}")]
    BadMaxValue(u32),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Writes `fb` as a plain (ascii) P3 image, one text row per scanline.
pub fn write_ppm<W: Write>(fb: &Framebuffer, mut w: W) -> std::io::Result<()> {
    use std::fmt::Write as _;

    let mut contents = String::new();
    // writing into a String cannot fail
    let _ = write!(contents, "P3\n{} {}\n255\n", fb.width(), fb.height());
    for row in fb.pixels().chunks(fb.width().max(1) as usize) {
        for color in row {
            let _ = write!(contents, "{} {} {} ", color.r, color.g, color.b);
        }
        contents.push('\n');
    }

    w.write_all(contents.as_bytes())
}

/// Reads a P3 image. Samples are rescaled from the declared max value to `0..=255`.
pub fn read_ppm<R: BufRead>(r: R) -> Result<Framebuffer, PpmError> {
    let mut tokens = Vec::new();
    for line in r.lines() {
        let line = line?;
        let data = match line.find('#') {
            Some(i) => &line[..i],
            None => &line[..],
        };
        tokens.extend(data.split_whitespace().map(str::to_owned));
    }
    let mut tokens = tokens.into_iter();

    let magic = tokens.next().ok_or(PpmError::Truncated("magic"))?;
    if magic != "P3" {
        return Err(PpmError::BadMagic(magic));
    }
    let mut next_number = |what: &'static str| -> Result<u32, PpmError> {
        let token = tokens.next().ok_or(PpmError::Truncated(what))?;
        token
            .parse::<u32>()
            .map_err(|_| PpmError::InvalidNumber { what, value: token })
    };

    let width = next_number("width")?;
    let height = next_number("height")?;
    let max = next_number("max value")?;
    if max == 0 || max > 65535 {
        return Err(PpmError::BadMaxValue(max));
    }

    let scale = |v: u32| ((v.min(max) as f32 / max as f32) * 255.0).round() as u8;
    let count = width as usize * height as usize;
    let mut pixels = Vec::with_capacity(count);
    for _ in 0..count {
        let r = next_number("sample")?;
        let g = next_number("sample")?;
        let b = next_number("sample")?;
        pixels.push(Color::new(scale(r), scale(g), scale(b)));
    }

    Ok(Framebuffer::from_pixels(width, height, pixels))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Canvas;

    #[test]
    fn writes_header_and_rows() {
        let mut fb = Framebuffer::new(2, 1);
        fb.set_pixel(1, 0, Color::FLAME);
        let mut out = Vec::new();
        write_ppm(&fb, &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "P3\n2 1\n255\n0 0 0 229 88 18 \n"
        );
    }

    #[test]
    fn reads_back_what_it_writes() {
        let mut fb = Framebuffer::new(3, 2);
        fb.set_pixel(0, 1, Color::LIME);
        fb.set_pixel(2, 0, Color::OCEAN);
        let mut out = Vec::new();
        write_ppm(&fb, &mut out).unwrap();
        assert_eq!(read_ppm(&out[..]).unwrap(), fb);
    }

    #[test]
    fn rescales_and_skips_comments() {
        let text = "P3 # plain ppm\n1 2\n# max\n15\n15 0 7\n 30 15 15\n";
        let fb = read_ppm(text.as_bytes()).unwrap();
        assert_eq!(fb.get_color(0, 0), Some(&Color::new(255, 0, 119)));
        assert_eq!(fb.get_color(0, 1), Some(&Color::WHITE));
    }

    #[test]
    fn rejects_bad_input() {
        assert!(matches!(read_ppm("P6 1 1 255".as_bytes()), Err(PpmError::BadMagic(_))));
        assert!(matches!(read_ppm("P3 1 1 255 0 0".as_bytes()), Err(PpmError::Truncated(_))));
        assert!(matches!(read_ppm("P3 1 x 255".as_bytes()), Err(PpmError::InvalidNumber { .. })));
        assert!(matches!(read_ppm("P3 1 1 0".as_bytes()), Err(PpmError::BadMaxValue(0))));
    }
}
