use chrono::{Datelike, Timelike};
use pdf_writer::{Content, Date, Filter, Name, Pdf, Rect, Ref, Str, TextStr};

use crate::error::Error;
use crate::fonts::{register_fonts, to_winansi_bytes};
use crate::geometry::PageGeometry;
use crate::model::{ChartImage, ReportMetadata};

use super::ReportLayout;
use super::canvas::{DrawOp, Page, Rgb};

const PRODUCER: &str = concat!("report-pdf ", env!("CARGO_PKG_VERSION"));
const STROKE_W: f32 = 0.5;

fn set_fill(content: &mut Content, [r, g, b]: Rgb) {
    content.set_fill_rgb(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0);
}

fn set_stroke(content: &mut Content, [r, g, b]: Rgb) {
    content.set_stroke_rgb(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0);
}

/// Decode a chart PNG and write it as a Flate-compressed RGB image XObject,
/// with a soft mask when any pixel is translucent.
fn embed_chart(
    pdf: &mut Pdf,
    alloc: &mut impl FnMut() -> Ref,
    chart: &ChartImage,
) -> Result<Ref, Error> {
    let cursor = std::io::Cursor::new(&chart.data);
    let reader =
        image::ImageReader::with_format(std::io::BufReader::new(cursor), image::ImageFormat::Png);
    let rgba: image::RgbaImage = reader.decode()?.to_rgba8();
    let (w, h) = (rgba.width(), rgba.height());
    let has_alpha = rgba.pixels().any(|p| p.0[3] < 255);

    let rgb_data: Vec<u8> = rgba
        .pixels()
        .flat_map(|p| [p.0[0], p.0[1], p.0[2]])
        .collect();
    let compressed_rgb = miniz_oxide::deflate::compress_to_vec_zlib(&rgb_data, 6);

    let smask_ref = if has_alpha {
        let alpha_data: Vec<u8> = rgba.pixels().map(|p| p.0[3]).collect();
        let compressed_alpha = miniz_oxide::deflate::compress_to_vec_zlib(&alpha_data, 6);
        let mask_ref = alloc();
        let mut mask = pdf.image_xobject(mask_ref, &compressed_alpha);
        mask.filter(Filter::FlateDecode);
        mask.width(w as i32);
        mask.height(h as i32);
        mask.color_space().device_gray();
        mask.bits_per_component(8);
        Some(mask_ref)
    } else {
        None
    };

    let xobj_ref = alloc();
    let mut xobj = pdf.image_xobject(xobj_ref, &compressed_rgb);
    xobj.filter(Filter::FlateDecode);
    xobj.width(w as i32);
    xobj.height(h as i32);
    xobj.color_space().device_rgb();
    xobj.bits_per_component(8);
    if let Some(mask_ref) = smask_ref {
        xobj.s_mask(mask_ref);
    }
    Ok(xobj_ref)
}

fn image_name(index: usize) -> String {
    format!("Im{}", index + 1)
}

/// Translate one page of draw ops into a content stream. Ops use top-down
/// offsets; PDF space grows upwards from the bottom edge.
fn page_content(page: &Page, geometry: &PageGeometry) -> Content {
    let flip = |y: f32| geometry.height - y;
    let mut content = Content::new();

    for op in &page.ops {
        match op {
            DrawOp::Text {
                text,
                x,
                baseline,
                size,
                face,
                color,
                clip,
            } => {
                content.save_state();
                if let Some(clip) = clip {
                    content.rect(clip.x, flip(clip.y + clip.height), clip.width, clip.height);
                    content.clip_nonzero();
                    content.end_path();
                }
                set_fill(&mut content, *color);
                content.begin_text();
                content.set_font(Name(face.pdf_name().as_bytes()), *size);
                content.next_line(*x, flip(*baseline));
                content.show(Str(&to_winansi_bytes(text)));
                content.end_text();
                content.restore_state();
            }
            DrawOp::Rect { area, fill, stroke } => {
                content.save_state();
                content.rect(area.x, flip(area.y + area.height), area.width, area.height);
                match (fill, stroke) {
                    (Some(f), Some(s)) => {
                        set_fill(&mut content, *f);
                        set_stroke(&mut content, *s);
                        content.set_line_width(STROKE_W);
                        content.fill_nonzero_and_stroke();
                    }
                    (Some(f), None) => {
                        set_fill(&mut content, *f);
                        content.fill_nonzero();
                    }
                    (None, Some(s)) => {
                        set_stroke(&mut content, *s);
                        content.set_line_width(STROKE_W);
                        content.stroke();
                    }
                    (None, None) => {
                        content.end_path();
                    }
                }
                content.restore_state();
            }
            DrawOp::Line {
                from,
                to,
                width,
                color,
            } => {
                content.save_state();
                content.set_line_width(*width);
                set_stroke(&mut content, *color);
                content.move_to(from.0, flip(from.1));
                content.line_to(to.0, flip(to.1));
                content.stroke();
                content.restore_state();
            }
            DrawOp::Image { image, area } => {
                let name = image_name(*image);
                content.save_state();
                content.transform([
                    area.width,
                    0.0,
                    0.0,
                    area.height,
                    area.x,
                    flip(area.y + area.height),
                ]);
                content.x_object(Name(name.as_bytes()));
                content.restore_state();
            }
        }
    }
    content
}

fn pdf_date(ts: &chrono::DateTime<chrono::Utc>) -> Date {
    Date::new(ts.year().clamp(0, 9999) as u16)
        .month(ts.month() as u8)
        .day(ts.day() as u8)
        .hour(ts.hour() as u8)
        .minute(ts.minute() as u8)
        .second(ts.second() as u8)
        .utc_offset_hour(0)
        .utc_offset_minute(0)
}

pub(super) fn write_pdf(
    layout: &ReportLayout,
    metadata: &ReportMetadata,
) -> Result<Vec<u8>, Error> {
    let t0 = std::time::Instant::now();
    let mut pdf = Pdf::new();
    let mut next_id = 1i32;
    let mut alloc = || {
        let r = Ref::new(next_id);
        next_id += 1;
        r
    };

    let catalog_id = alloc();
    let pages_id = alloc();
    let info_id = alloc();

    let font_pairs = register_fonts(&mut pdf, &mut alloc);

    let mut image_xobjects: Vec<(String, Ref)> = Vec::with_capacity(layout.images.len());
    for (i, chart) in layout.images.iter().enumerate() {
        let xobj_ref = embed_chart(&mut pdf, &mut alloc, chart)?;
        image_xobjects.push((image_name(i), xobj_ref));
    }
    let t_images = t0.elapsed();

    let n = layout.pages.len();
    let page_ids: Vec<Ref> = (0..n).map(|_| alloc()).collect();
    let content_ids: Vec<Ref> = (0..n).map(|_| alloc()).collect();

    for (i, page) in layout.pages.iter().enumerate() {
        let raw = page_content(page, &layout.geometry).finish();
        let compressed = miniz_oxide::deflate::compress_to_vec_zlib(raw.as_slice(), 6);
        pdf.stream(content_ids[i], &compressed).filter(Filter::FlateDecode);
    }

    pdf.catalog(catalog_id).pages(pages_id);
    pdf.pages(pages_id)
        .kids(page_ids.iter().copied())
        .count(n as i32);

    let geometry = &layout.geometry;
    for i in 0..n {
        let mut page = pdf.page(page_ids[i]);
        page.media_box(Rect::new(0.0, 0.0, geometry.width, geometry.height))
            .parent(pages_id)
            .contents(content_ids[i]);
        let mut resources = page.resources();
        {
            let mut fonts = resources.fonts();
            for (name, font_ref) in &font_pairs {
                fonts.pair(Name(name.as_bytes()), *font_ref);
            }
        }
        if !image_xobjects.is_empty() {
            let mut xobjects = resources.x_objects();
            for (name, xobj_ref) in &image_xobjects {
                xobjects.pair(Name(name.as_bytes()), *xobj_ref);
            }
        }
    }

    {
        let mut info = pdf.document_info(info_id);
        info.title(TextStr(&metadata.report_name));
        info.subject(TextStr(&metadata.report_type));
        if let Some(by) = &metadata.generated_by {
            info.author(TextStr(by));
        }
        info.producer(TextStr(PRODUCER));
        info.creation_date(pdf_date(&metadata.generated_at));
    }

    let bytes = pdf.finish();
    log::info!(
        "Serialize: pages={}, images={}, embed={:.1}ms, total={:.1}ms, {} bytes",
        n,
        image_xobjects.len(),
        t_images.as_secs_f64() * 1000.0,
        t0.elapsed().as_secs_f64() * 1000.0,
        bytes.len(),
    );
    Ok(bytes)
}
