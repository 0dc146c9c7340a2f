//! PPTX file parser implementation.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use slide_core::{Deck, Error, Result, Slide, SlideShape};
use std::io::{Read, Seek};
use zip::ZipArchive;

const PRESENTATION_PATH: &str = "ppt/presentation.xml";
const PRESENTATION_RELS_PATH: &str = "ppt/_rels/presentation.xml.rels";

/// Parser for PPTX (Office Open XML) files.
pub struct PptxParser;

impl PptxParser {
    /// Create a new PPTX parser.
    pub fn new() -> Self {
        Self
    }

    /// Parse a PPTX file from a reader.
    pub fn parse<R: Read + Seek>(&self, reader: R, filename: &str) -> Result<Deck> {
        let mut archive = ZipArchive::new(reader)
            .map_err(|e| Error::ZipError(format!("Failed to open ZIP: {}", e)))?;

        let mut deck = Deck::new(filename);

        let slide_order = self.get_slide_order(&mut archive)?;
        log::debug!("Found {} slides in {}", slide_order.len(), filename);

        for (idx, slide_path) in slide_order.iter().enumerate() {
            let slide = self.parse_slide(&mut archive, slide_path, idx + 1)?;
            deck.add_slide(slide);
        }

        Ok(deck)
    }

    /// Get the ordered list of slide paths.
    ///
    /// Uses the slide id list in presentation.xml when present, otherwise
    /// falls back to the numeric suffix of the relationship ids.
    fn get_slide_order<R: Read + Seek>(&self, archive: &mut ZipArchive<R>) -> Result<Vec<String>> {
        let rels_content = self.read_file_from_archive(archive, PRESENTATION_RELS_PATH)?;
        let mut slides = parse_slide_relationships(&rels_content)?;

        let listed_ids = match self.read_file_from_archive(archive, PRESENTATION_PATH) {
            Ok(content) => parse_slide_id_list(&content)?,
            Err(e) => {
                log::warn!("No usable {} ({}), ordering slides by id", PRESENTATION_PATH, e);
                Vec::new()
            }
        };

        if !listed_ids.is_empty() {
            let ordered = listed_ids
                .iter()
                .filter_map(|id| {
                    let found = slides.iter().find(|rel| &rel.id == id);
                    if found.is_none() {
                        log::warn!("Slide id {} has no relationship, skipping", id);
                    }
                    found.map(|rel| rel.path.clone())
                })
                .collect();
            return Ok(ordered);
        }

        slides.sort_by(|a, b| match (a.order, b.order) {
            (Some(na), Some(nb)) => na.cmp(&nb),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => a.path.cmp(&b.path),
        });

        Ok(slides.into_iter().map(|rel| rel.path).collect())
    }

    /// Parse a single slide from the archive.
    fn parse_slide<R: Read + Seek>(
        &self,
        archive: &mut ZipArchive<R>,
        slide_path: &str,
        slide_number: usize,
    ) -> Result<Slide> {
        let content = self.read_file_from_archive(archive, slide_path)?;
        let mut slide = Slide::new(slide_number);

        for shape in self.extract_shapes_from_xml(&content) {
            slide.add_shape(shape);
        }

        log::debug!(
            "Slide {} ({}) has {} shapes",
            slide_number,
            slide_path,
            slide.shapes.len()
        );

        Ok(slide)
    }

    /// Extract shapes in document order from slide XML.
    ///
    /// Group shapes are flattened into their children. Every `sp` carries
    /// text (possibly empty); pictures, graphic frames and connectors do not.
    fn extract_shapes_from_xml(&self, xml_content: &str) -> Vec<SlideShape> {
        let mut shapes = Vec::new();
        let mut reader = Reader::from_str(xml_content);

        let mut current: Option<ShapeBuilder> = None;
        let mut in_run_text = false;

        loop {
            match reader.read_event() {
                Ok(Event::Start(ref e)) => {
                    let name = e.name();
                    let local = local_name(name.as_ref());

                    match (local, current.as_mut()) {
                        (b"sp" | b"pic" | b"graphicFrame" | b"cxnSp", None) => {
                            current = Some(ShapeBuilder::new(local == b"sp"));
                        }
                        (b"cNvPr", Some(shape)) => shape.read_name(e),
                        (b"txBody", Some(shape)) => shape.start_text_body(),
                        (b"p", Some(shape)) => shape.start_paragraph(),
                        (b"t", Some(shape)) if shape.in_text_body => in_run_text = true,
                        _ => {}
                    }
                }
                Ok(Event::Empty(ref e)) => {
                    let name = e.name();
                    let local = local_name(name.as_ref());

                    if let Some(shape) = current.as_mut() {
                        match local {
                            b"cNvPr" => shape.read_name(e),
                            b"p" => shape.start_paragraph(),
                            b"br" => shape.push_text("\n"),
                            _ => {}
                        }
                    }
                }
                Ok(Event::Text(ref e)) => {
                    if in_run_text {
                        if let Some(shape) = current.as_mut() {
                            let text = e.unescape().unwrap_or_default();
                            shape.push_text(&text);
                        }
                    }
                }
                Ok(Event::End(ref e)) => {
                    let name = e.name();
                    let local = local_name(name.as_ref());

                    match local {
                        b"sp" | b"pic" | b"graphicFrame" | b"cxnSp" => {
                            if let Some(shape) = current.take() {
                                shapes.push(shape.finish());
                            }
                            in_run_text = false;
                        }
                        b"txBody" => {
                            if let Some(shape) = current.as_mut() {
                                shape.in_text_body = false;
                            }
                        }
                        b"t" => in_run_text = false,
                        _ => {}
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    log::warn!("XML parsing error, keeping {} shapes read so far: {}", shapes.len(), e);
                    break;
                }
                _ => {}
            }
        }

        shapes
    }

    /// Read a file from the ZIP archive.
    fn read_file_from_archive<R: Read + Seek>(
        &self,
        archive: &mut ZipArchive<R>,
        path: &str,
    ) -> Result<String> {
        let mut file = archive
            .by_name(path)
            .map_err(|e| Error::ZipError(format!("File not found in archive '{}': {}", path, e)))?;

        let mut content = String::new();
        file.read_to_string(&mut content)
            .map_err(|e| Error::PptxParseError(format!("Failed to read '{}': {}", path, e)))?;

        Ok(content)
    }
}

impl Default for PptxParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Shape being assembled while its XML element is open.
#[derive(Debug)]
struct ShapeBuilder {
    name: Option<String>,
    /// `Some` for shapes that can hold text.
    text: Option<String>,
    in_text_body: bool,
    paragraphs: usize,
}

impl ShapeBuilder {
    fn new(holds_text: bool) -> Self {
        Self {
            name: None,
            text: holds_text.then(String::new),
            in_text_body: false,
            paragraphs: 0,
        }
    }

    fn read_name(&mut self, e: &BytesStart<'_>) {
        if self.name.is_some() {
            return;
        }
        self.name = e
            .attributes()
            .flatten()
            .find(|attr| attr.key.as_ref() == b"name")
            .and_then(|attr| attr.unescape_value().ok())
            .map(|v| v.into_owned());
    }

    fn start_text_body(&mut self) {
        // Tables inside graphic frames have text bodies too; they don't count.
        if self.text.is_some() {
            self.in_text_body = true;
        }
    }

    fn start_paragraph(&mut self) {
        if !self.in_text_body {
            return;
        }
        if self.paragraphs > 0 {
            self.push_text("\n");
        }
        self.paragraphs += 1;
    }

    fn push_text(&mut self, fragment: &str) {
        if !self.in_text_body {
            return;
        }
        if let Some(text) = self.text.as_mut() {
            text.push_str(fragment);
        }
    }

    fn finish(self) -> SlideShape {
        let mut shape = match self.text {
            Some(text) => SlideShape::with_text(text),
            None => SlideShape::non_text(),
        };
        shape.name = self.name;
        shape
    }
}

/// A slide relationship from presentation.xml.rels.
#[derive(Debug)]
struct SlideRel {
    id: String,
    path: String,
    order: Option<usize>,
}

/// Collect slide relationships, resolving targets to archive paths.
fn parse_slide_relationships(content: &str) -> Result<Vec<SlideRel>> {
    let mut slides = Vec::new();
    let mut reader = Reader::from_str(content);
    reader.trim_text(true);

    loop {
        match reader.read_event() {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                if local_name(e.name().as_ref()) == b"Relationship" =>
            {
                let mut rel_type = String::new();
                let mut target = String::new();
                let mut id = String::new();

                for attr in e.attributes().flatten() {
                    let value = String::from_utf8_lossy(&attr.value).to_string();
                    match attr.key.as_ref() {
                        b"Type" => rel_type = value,
                        b"Target" => target = value,
                        b"Id" => id = value,
                        _ => {}
                    }
                }

                if rel_type.ends_with("/slide") {
                    let order = extract_slide_number(&id).or_else(|| extract_slide_number(&target));
                    let path = match target.strip_prefix('/') {
                        Some(absolute) => absolute.to_string(),
                        None => format!("ppt/{}", target),
                    };
                    slides.push(SlideRel { id, path, order });
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::XmlError(format!(
                    "Error parsing relationships: {}",
                    e
                )));
            }
            _ => {}
        }
    }

    Ok(slides)
}

/// Collect the relationship ids of `sldId` entries in presentation order.
fn parse_slide_id_list(content: &str) -> Result<Vec<String>> {
    let mut ids = Vec::new();
    let mut reader = Reader::from_str(content);
    reader.trim_text(true);

    loop {
        match reader.read_event() {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                if local_name(e.name().as_ref()) == b"sldId" =>
            {
                // `id` is the numeric slide id; the prefixed `r:id` is the relationship.
                let rel_id = e
                    .attributes()
                    .flatten()
                    .find(|attr| attr.key.as_ref().ends_with(b":id"))
                    .map(|attr| String::from_utf8_lossy(&attr.value).to_string());

                if let Some(rel_id) = rel_id {
                    ids.push(rel_id);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::XmlError(format!(
                    "Error parsing presentation: {}",
                    e
                )));
            }
            _ => {}
        }
    }

    Ok(ids)
}

/// Extract the local name from a potentially namespaced XML element name.
fn local_name(name: &[u8]) -> &[u8] {
    if let Some(pos) = name.iter().position(|&b| b == b':') {
        &name[pos + 1..]
    } else {
        name
    }
}

/// Extract a slide number from a string like "rId2" or "slide3.xml".
fn extract_slide_number(s: &str) -> Option<usize> {
    let s = s.trim_end_matches(".xml").trim_end_matches(".rels");

    let digits: String = s.chars().rev().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    let digits: String = digits.chars().rev().collect();
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use slide_core::{analyze_slide, ShapeCategory, TextShape};
    use std::io::{Cursor, Write};
    use zip::write::FileOptions;

    const RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster" Target="slideMasters/slideMaster1.xml"/>
  <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide" Target="slides/slide1.xml"/>
  <Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide" Target="slides/slide2.xml"/>
</Relationships>"#;

    const PRESENTATION: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:presentation xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
  <p:sldIdLst>
    <p:sldId id="257" r:id="rId3"/>
    <p:sldId id="256" r:id="rId2"/>
  </p:sldIdLst>
</p:presentation>"#;

    const AGENDA_SLIDE: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sld xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main">
  <p:cSld><p:spTree>
    <p:sp>
      <p:nvSpPr><p:cNvPr id="2" name="Title 1"/></p:nvSpPr>
      <p:txBody><a:bodyPr/><a:p><a:r><a:t>Q3 Results</a:t></a:r></a:p></p:txBody>
    </p:sp>
    <p:sp>
      <p:nvSpPr><p:cNvPr id="3" name="Content 2"/></p:nvSpPr>
      <p:txBody><a:bodyPr/>
        <a:p><a:r><a:t>Revenue </a:t></a:r><a:r><a:t>up</a:t></a:r></a:p>
        <a:p><a:r><a:t>R&amp;D steady</a:t></a:r></a:p>
        <a:p/>
        <a:p><a:r><a:t>Outlook</a:t></a:r><a:br/><a:r><a:t>positive</a:t></a:r></a:p>
      </p:txBody>
    </p:sp>
    <p:pic><p:nvPicPr><p:cNvPr id="4" name="Picture 3"/></p:nvPicPr></p:pic>
    <p:grpSp>
      <p:nvGrpSpPr><p:cNvPr id="5" name="Group 4"/></p:nvGrpSpPr>
      <p:sp><p:nvSpPr><p:cNvPr id="6" name="Rectangle 5"/></p:nvSpPr><p:spPr/></p:sp>
      <p:sp><p:nvSpPr><p:cNvPr id="7" name="TextBox 6"/></p:nvSpPr>
        <p:txBody><a:p><a:r><a:t>Footnote</a:t></a:r></a:p></p:txBody></p:sp>
    </p:grpSp>
    <p:graphicFrame>
      <p:nvGraphicFramePr><p:cNvPr id="8" name="Table 7"/></p:nvGraphicFramePr>
      <a:graphic><a:graphicData><a:tbl><a:tr><a:tc>
        <a:txBody><a:p><a:r><a:t>Cell</a:t></a:r></a:p></a:txBody>
      </a:tc></a:tr></a:tbl></a:graphicData></a:graphic>
    </p:graphicFrame>
  </p:spTree></p:cSld>
</p:sld>"#;

    const CLOSING_SLIDE: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sld xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main">
  <p:cSld><p:spTree>
    <p:sp><p:nvSpPr><p:cNvPr id="2" name="Title 1"/></p:nvSpPr>
      <p:txBody><a:p><a:r><a:t>Questions?</a:t></a:r></a:p></p:txBody></p:sp>
  </p:spTree></p:cSld>
</p:sld>"#;

    fn build_pptx(files: &[(&str, &str)]) -> Cursor<Vec<u8>> {
        let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
        for (path, content) in files {
            zip.start_file(*path, FileOptions::default()).unwrap();
            zip.write_all(content.as_bytes()).unwrap();
        }
        let cursor = zip.finish().unwrap();
        Cursor::new(cursor.into_inner())
    }

    #[test]
    fn test_extract_slide_number() {
        assert_eq!(extract_slide_number("rId1"), Some(1));
        assert_eq!(extract_slide_number("rId12"), Some(12));
        assert_eq!(extract_slide_number("slide1.xml"), Some(1));
        assert_eq!(extract_slide_number("slide123.xml"), Some(123));
        assert_eq!(extract_slide_number("nodigits"), None);
    }

    #[test]
    fn test_local_name() {
        assert_eq!(local_name(b"p:sp"), b"sp");
        assert_eq!(local_name(b"a:t"), b"t");
        assert_eq!(local_name(b"sp"), b"sp");
    }

    #[test]
    fn test_extract_shapes_in_document_order() {
        let shapes = PptxParser::new().extract_shapes_from_xml(AGENDA_SLIDE);

        let names: Vec<&str> = shapes.iter().filter_map(|s| s.name.as_deref()).collect();
        assert_eq!(
            names,
            vec!["Title 1", "Content 2", "Picture 3", "Rectangle 5", "TextBox 6", "Table 7"]
        );

        assert_eq!(shapes[0].text().unwrap(), "Q3 Results");
        assert_eq!(
            shapes[1].text().unwrap(),
            "Revenue up\nR&D steady\n\nOutlook\npositive"
        );
        assert!(!shapes[2].has_text());
        assert_eq!(shapes[3].text().unwrap(), "");
        assert_eq!(shapes[4].text().unwrap(), "Footnote");
        assert!(!shapes[5].has_text());
    }

    #[test]
    fn test_parse_orders_slides_by_id_list() {
        let pptx = build_pptx(&[
            ("ppt/_rels/presentation.xml.rels", RELS),
            ("ppt/presentation.xml", PRESENTATION),
            ("ppt/slides/slide1.xml", AGENDA_SLIDE),
            ("ppt/slides/slide2.xml", CLOSING_SLIDE),
        ]);

        let deck = PptxParser::new().parse(pptx, "review.pptx").unwrap();

        assert_eq!(deck.filename, "review.pptx");
        assert_eq!(deck.slides.len(), 2);
        assert_eq!(deck.slides[0].number, 1);
        assert_eq!(deck.slides[0].shapes[0].text().unwrap(), "Questions?");
        assert_eq!(deck.slide(2).unwrap().shapes.len(), 6);
    }

    #[test]
    fn test_parse_falls_back_to_relationship_order() {
        let pptx = build_pptx(&[
            ("ppt/_rels/presentation.xml.rels", RELS),
            ("ppt/slides/slide1.xml", AGENDA_SLIDE),
            ("ppt/slides/slide2.xml", CLOSING_SLIDE),
        ]);

        let deck = PptxParser::new().parse(pptx, "review.pptx").unwrap();
        assert_eq!(deck.slides[0].shapes[0].text().unwrap(), "Q3 Results");
        assert_eq!(deck.slides[1].shapes[0].text().unwrap(), "Questions?");
    }

    #[test]
    fn test_parsed_slide_classification() {
        let shapes = PptxParser::new().extract_shapes_from_xml(AGENDA_SLIDE);
        let report = analyze_slide(1, &shapes);

        let categories: Vec<ShapeCategory> = report.shapes.iter().map(|s| s.category).collect();
        assert_eq!(
            categories,
            vec![
                ShapeCategory::Title,
                ShapeCategory::BulletList,
                ShapeCategory::NonText,
                ShapeCategory::EmptyText,
                ShapeCategory::Title,
                ShapeCategory::NonText,
            ]
        );
    }

    #[test]
    fn test_parse_reports_unreadable_slide() {
        let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
        zip.start_file("ppt/_rels/presentation.xml.rels", FileOptions::default())
            .unwrap();
        zip.write_all(RELS.as_bytes()).unwrap();
        zip.start_file("ppt/slides/slide1.xml", FileOptions::default())
            .unwrap();
        zip.write_all(&[0xff, 0xfe, 0x00, 0x3c]).unwrap();
        let pptx = Cursor::new(zip.finish().unwrap().into_inner());

        let result = PptxParser::new().parse(pptx, "broken.pptx");
        assert!(matches!(result, Err(Error::PptxParseError(msg)) if msg.contains("slide1.xml")));
    }

    #[test]
    fn test_parse_rejects_non_zip() {
        let result = PptxParser::new().parse(Cursor::new(b"not a zip".to_vec()), "bad.pptx");
        assert!(matches!(result, Err(Error::ZipError(_))));
    }
}
