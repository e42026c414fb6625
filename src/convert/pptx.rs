//! A minimal PresentationML package writer.
//!
//! ## Why hand-written XML?
//!
//! The presentations produced here have exactly one shape: blank-layout
//! slides whose only content is a picture covering the whole slide. That
//! needs one master, one layout, one theme and one slide part per page,
//! about a dozen fixed XML templates in total. Writing them straight into a
//! [`zip::ZipWriter`] keeps page images in memory on their way into the
//! package; nothing is staged on disk per page.
//!
//! ## Package layout
//!
//! ```text
//! [Content_Types].xml
//! _rels/.rels
//! ppt/presentation.xml            ppt/_rels/presentation.xml.rels
//! ppt/slideMasters/slideMaster1.xml (+ rels)
//! ppt/slideLayouts/slideLayout1.xml (+ rels)
//! ppt/theme/theme1.xml
//! ppt/slides/slide{n}.xml (+ rels)
//! ppt/media/image{n}.png
//! ```

use crate::config::SlideSize;
use std::io::{Seek, Write};
use zip::result::ZipResult;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

const NS_DECLS: &str = concat!(
    r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" "#,
    r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" "#,
    r#"xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main""#
);

const XML_HEADER: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

const REL_BASE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

const CT_BASE: &str = "application/vnd.openxmlformats-officedocument";

/// First id of a slide in `p:sldIdLst`; lower values are reserved.
const FIRST_SLIDE_ID: usize = 256;

/// Streams a picture-per-slide presentation into a zip container.
pub struct PresentationWriter<W: Write + Seek> {
    zip: ZipWriter<W>,
    slide_size: SlideSize,
    slides: usize,
}

impl<W: Write + Seek> PresentationWriter<W> {
    pub fn new(writer: W, slide_size: SlideSize) -> Self {
        Self {
            zip: ZipWriter::new(writer),
            slide_size,
            slides: 0,
        }
    }

    pub fn slide_count(&self) -> usize {
        self.slides
    }

    /// Append a slide showing `png` stretched over the full slide.
    pub fn add_picture_slide(&mut self, png: &[u8]) -> ZipResult<()> {
        self.slides += 1;
        let n = self.slides;
        let (cx, cy) = self.slide_size.emu();

        // PNG data is already deflated.
        let stored = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
        self.zip.start_file(format!("ppt/media/image{n}.png"), stored)?;
        self.zip.write_all(png)?;

        self.write_part(&format!("ppt/slides/slide{n}.xml"), &slide_xml(n, cx, cy))?;
        self.write_part(
            &format!("ppt/slides/_rels/slide{n}.xml.rels"),
            &relationships(&[
                (1, "slideLayout", "../slideLayouts/slideLayout1.xml".to_string()),
                (2, "image", format!("../media/image{n}.png")),
            ]),
        )
    }

    /// Write the package-level parts and close the container.
    pub fn finish(mut self) -> ZipResult<W> {
        let (cx, cy) = self.slide_size.emu();

        self.write_part("[Content_Types].xml", &content_types_xml(self.slides))?;
        self.write_part(
            "_rels/.rels",
            &relationships(&[(1, "officeDocument", "ppt/presentation.xml".to_string())]),
        )?;
        self.write_part(
            "ppt/presentation.xml",
            &presentation_xml(self.slides, cx, cy, self.slide_size.ooxml_type()),
        )?;

        let mut rels = vec![
            (1, "slideMaster", "slideMasters/slideMaster1.xml".to_string()),
            (2, "theme", "theme/theme1.xml".to_string()),
        ];
        rels.extend((1..=self.slides).map(|n| (n + 2, "slide", format!("slides/slide{n}.xml"))));
        self.write_part("ppt/_rels/presentation.xml.rels", &relationships(&rels))?;

        self.write_part("ppt/slideMasters/slideMaster1.xml", &slide_master_xml())?;
        self.write_part(
            "ppt/slideMasters/_rels/slideMaster1.xml.rels",
            &relationships(&[
                (1, "slideLayout", "../slideLayouts/slideLayout1.xml".to_string()),
                (2, "theme", "../theme/theme1.xml".to_string()),
            ]),
        )?;
        self.write_part("ppt/slideLayouts/slideLayout1.xml", &slide_layout_xml())?;
        self.write_part(
            "ppt/slideLayouts/_rels/slideLayout1.xml.rels",
            &relationships(&[(1, "slideMaster", "../slideMasters/slideMaster1.xml".to_string())]),
        )?;
        self.write_part("ppt/theme/theme1.xml", THEME_XML)?;

        self.zip.finish()
    }

    fn write_part(&mut self, name: &str, xml: &str) -> ZipResult<()> {
        self.zip.start_file(name, SimpleFileOptions::default())?;
        self.zip.write_all(xml.as_bytes())?;
        Ok(())
    }
}

// ── Part templates ───────────────────────────────────────────────────────

fn relationships(rels: &[(usize, &str, String)]) -> String {
    let mut xml = format!(
        r#"{XML_HEADER}<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#
    );
    for (id, kind, target) in rels {
        xml.push_str(&format!(
            r#"<Relationship Id="rId{id}" Type="{REL_BASE}/{kind}" Target="{target}"/>"#
        ));
    }
    xml.push_str("</Relationships>");
    xml
}

fn content_types_xml(slides: usize) -> String {
    let mut xml = format!(
        concat!(
            r#"{}<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#,
            r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#,
            r#"<Default Extension="xml" ContentType="application/xml"/>"#,
            r#"<Default Extension="png" ContentType="image/png"/>"#,
            r#"<Override PartName="/ppt/presentation.xml" ContentType="{ct}.presentationml.presentation.main+xml"/>"#,
            r#"<Override PartName="/ppt/slideMasters/slideMaster1.xml" ContentType="{ct}.presentationml.slideMaster+xml"/>"#,
            r#"<Override PartName="/ppt/slideLayouts/slideLayout1.xml" ContentType="{ct}.presentationml.slideLayout+xml"/>"#,
            r#"<Override PartName="/ppt/theme/theme1.xml" ContentType="{ct}.theme+xml"/>"#,
        ),
        XML_HEADER,
        ct = CT_BASE
    );
    for n in 1..=slides {
        xml.push_str(&format!(
            r#"<Override PartName="/ppt/slides/slide{n}.xml" ContentType="{CT_BASE}.presentationml.slide+xml"/>"#
        ));
    }
    xml.push_str("</Types>");
    xml
}

fn presentation_xml(slides: usize, cx: u64, cy: u64, size_type: &str) -> String {
    let mut xml = format!(
        r#"{XML_HEADER}<p:presentation {NS_DECLS} saveSubsetFonts="1"><p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="rId1"/></p:sldMasterIdLst>"#
    );
    if slides > 0 {
        xml.push_str("<p:sldIdLst>");
        for n in 1..=slides {
            xml.push_str(&format!(
                r#"<p:sldId id="{}" r:id="rId{}"/>"#,
                FIRST_SLIDE_ID + n - 1,
                n + 2
            ));
        }
        xml.push_str("</p:sldIdLst>");
    }
    xml.push_str(&format!(
        r#"<p:sldSz cx="{cx}" cy="{cy}" type="{size_type}"/><p:notesSz cx="6858000" cy="9144000"/></p:presentation>"#
    ));
    xml
}

/// The empty group-shape header every `p:spTree` starts with.
const SP_TREE_HEADER: &str = concat!(
    r#"<p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>"#,
    r#"<p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/>"#,
    r#"<a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr>"#
);

fn slide_xml(n: usize, cx: u64, cy: u64) -> String {
    format!(
        concat!(
            r#"{header}<p:sld {ns}><p:cSld><p:spTree>{tree}"#,
            r#"<p:pic><p:nvPicPr><p:cNvPr id="2" name="Page {n}"/>"#,
            r#"<p:cNvPicPr><a:picLocks noChangeAspect="1"/></p:cNvPicPr><p:nvPr/></p:nvPicPr>"#,
            r#"<p:blipFill><a:blip r:embed="rId2"/><a:stretch><a:fillRect/></a:stretch></p:blipFill>"#,
            r#"<p:spPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="{cx}" cy="{cy}"/></a:xfrm>"#,
            r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom></p:spPr></p:pic>"#,
            r#"</p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sld>"#,
        ),
        header = XML_HEADER,
        ns = NS_DECLS,
        tree = SP_TREE_HEADER,
        n = n,
        cx = cx,
        cy = cy,
    )
}

fn slide_master_xml() -> String {
    format!(
        concat!(
            r#"{header}<p:sldMaster {ns}><p:cSld><p:spTree>{tree}</p:spTree></p:cSld>"#,
            r#"<p:clrMap bg1="lt1" tx1="dk1" bg2="lt2" tx2="dk2" accent1="accent1" accent2="accent2" "#,
            r#"accent3="accent3" accent4="accent4" accent5="accent5" accent6="accent6" "#,
            r#"hlink="hlink" folHlink="folHlink"/>"#,
            r#"<p:sldLayoutIdLst><p:sldLayoutId id="2147483649" r:id="rId1"/></p:sldLayoutIdLst>"#,
            r#"</p:sldMaster>"#,
        ),
        header = XML_HEADER,
        ns = NS_DECLS,
        tree = SP_TREE_HEADER,
    )
}

fn slide_layout_xml() -> String {
    format!(
        concat!(
            r#"{header}<p:sldLayout {ns} type="blank" preserve="1">"#,
            r#"<p:cSld name="Blank"><p:spTree>{tree}</p:spTree></p:cSld>"#,
            r#"<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sldLayout>"#,
        ),
        header = XML_HEADER,
        ns = NS_DECLS,
        tree = SP_TREE_HEADER,
    )
}

const THEME_XML: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<a:theme xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" name="Office Theme"><a:themeElements>"#,
    r#"<a:clrScheme name="Office">"#,
    r#"<a:dk1><a:sysClr val="windowText" lastClr="000000"/></a:dk1>"#,
    r#"<a:lt1><a:sysClr val="window" lastClr="FFFFFF"/></a:lt1>"#,
    r#"<a:dk2><a:srgbClr val="1F497D"/></a:dk2><a:lt2><a:srgbClr val="EEECE1"/></a:lt2>"#,
    r#"<a:accent1><a:srgbClr val="4F81BD"/></a:accent1><a:accent2><a:srgbClr val="C0504D"/></a:accent2>"#,
    r#"<a:accent3><a:srgbClr val="9BBB59"/></a:accent3><a:accent4><a:srgbClr val="8064A2"/></a:accent4>"#,
    r#"<a:accent5><a:srgbClr val="4BACC6"/></a:accent5><a:accent6><a:srgbClr val="F79646"/></a:accent6>"#,
    r#"<a:hlink><a:srgbClr val="0000FF"/></a:hlink><a:folHlink><a:srgbClr val="800080"/></a:folHlink>"#,
    r#"</a:clrScheme>"#,
    r#"<a:fontScheme name="Office">"#,
    r#"<a:majorFont><a:latin typeface="Calibri"/><a:ea typeface=""/><a:cs typeface=""/></a:majorFont>"#,
    r#"<a:minorFont><a:latin typeface="Calibri"/><a:ea typeface=""/><a:cs typeface=""/></a:minorFont>"#,
    r#"</a:fontScheme>"#,
    r#"<a:fmtScheme name="Office"><a:fillStyleLst>"#,
    r#"<a:solidFill><a:schemeClr val="phClr"/></a:solidFill>"#,
    r#"<a:solidFill><a:schemeClr val="phClr"/></a:solidFill>"#,
    r#"<a:solidFill><a:schemeClr val="phClr"/></a:solidFill>"#,
    r#"</a:fillStyleLst><a:lnStyleLst>"#,
    r#"<a:ln w="9525"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln>"#,
    r#"<a:ln w="25400"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln>"#,
    r#"<a:ln w="38100"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln>"#,
    r#"</a:lnStyleLst><a:effectStyleLst>"#,
    r#"<a:effectStyle><a:effectLst/></a:effectStyle>"#,
    r#"<a:effectStyle><a:effectLst/></a:effectStyle>"#,
    r#"<a:effectStyle><a:effectLst/></a:effectStyle>"#,
    r#"</a:effectStyleLst><a:bgFillStyleLst>"#,
    r#"<a:solidFill><a:schemeClr val="phClr"/></a:solidFill>"#,
    r#"<a:solidFill><a:schemeClr val="phClr"/></a:solidFill>"#,
    r#"<a:solidFill><a:schemeClr val="phClr"/></a:solidFill>"#,
    r#"</a:bgFillStyleLst></a:fmtScheme>"#,
    r#"</a:themeElements></a:theme>"#,
);
