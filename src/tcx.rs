use crate::error::TcxError;
use crate::types::ResolvedActivity;
use crate::units::format_utc;
use chrono::Duration;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use std::io::{self, Write as _};
use std::path::Path;
use tempfile::NamedTempFile;

const TCX_NS: &str = "http://www.garmin.com/xmlschemas/TrainingCenterDatabase/v2";
const XSI_NS: &str = "http://www.w3.org/2001/XMLSchema-instance";
const SCHEMA_LOCATION: &str = "http://www.garmin.com/xmlschemas/TrainingCenterDatabase/v2 \
     http://www.garmin.com/xmlschemas/TrainingCenterDatabasev2.xsd";

/// Serialize one activity into TCX bytes.
///
/// The element order is fixed; importers are allowed to be order-sensitive.
pub fn render(activity: &ResolvedActivity) -> Result<Vec<u8>, TcxError> {
    let mut buf = Vec::new();
    write_document(&mut buf, activity).map_err(TcxError::Serialize)?;
    Ok(buf)
}

/// Render `activity` and write it to `path`, replacing any existing file.
///
/// The document lands in a temp file next to the destination and is renamed
/// over it, so readers never observe a half-written file. The parent
/// directory must already exist.
pub fn write(path: &Path, activity: &ResolvedActivity) -> Result<(), TcxError> {
    let doc = render(activity)?;

    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let io_err = |source: io::Error| TcxError::Io {
        path: path.to_path_buf(),
        source,
    };

    let mut tmp = NamedTempFile::new_in(parent).map_err(io_err)?;
    tmp.write_all(&doc).map_err(io_err)?;
    tmp.persist(path).map_err(|e| io_err(e.error))?;

    Ok(())
}

fn write_document<W: io::Write>(out: W, a: &ResolvedActivity) -> io::Result<()> {
    let mut xml = Writer::new(out);

    let start = format_utc(a.start);
    let end = format_utc(a.start + Duration::seconds(i64::from(a.duration_s)));
    let distance = format!("{:.2}", a.distance_m);

    xml.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut root = BytesStart::new("TrainingCenterDatabase");
    root.push_attribute(("xmlns", TCX_NS));
    root.push_attribute(("xmlns:xsi", XSI_NS));
    root.push_attribute(("xsi:schemaLocation", SCHEMA_LOCATION));
    xml.write_event(Event::Start(root))?;

    xml.write_event(Event::Start(BytesStart::new("Activities")))?;

    let mut activity = BytesStart::new("Activity");
    activity.push_attribute(("Sport", a.sport.as_str()));
    xml.write_event(Event::Start(activity))?;

    text_element(&mut xml, "Id", &start)?;

    let mut lap = BytesStart::new("Lap");
    lap.push_attribute(("StartTime", start.as_str()));
    xml.write_event(Event::Start(lap))?;

    text_element(&mut xml, "TotalTimeSeconds", &a.duration_s.to_string())?;
    text_element(&mut xml, "DistanceMeters", &distance)?;

    if let Some(hr) = a.avg_hr {
        xml.write_event(Event::Start(BytesStart::new("AverageHeartRateBpm")))?;
        text_element(&mut xml, "Value", &hr.to_string())?;
        xml.write_event(Event::End(BytesEnd::new("AverageHeartRateBpm")))?;
    }

    text_element(&mut xml, "Intensity", "Active")?;
    text_element(&mut xml, "TriggerMethod", "Manual")?;

    // Minimal track: one sample at the start, one at the end.
    xml.write_event(Event::Start(BytesStart::new("Track")))?;

    xml.write_event(Event::Start(BytesStart::new("Trackpoint")))?;
    text_element(&mut xml, "Time", &start)?;
    xml.write_event(Event::End(BytesEnd::new("Trackpoint")))?;

    xml.write_event(Event::Start(BytesStart::new("Trackpoint")))?;
    text_element(&mut xml, "Time", &end)?;
    text_element(&mut xml, "DistanceMeters", &distance)?;
    xml.write_event(Event::End(BytesEnd::new("Trackpoint")))?;

    xml.write_event(Event::End(BytesEnd::new("Track")))?;
    xml.write_event(Event::End(BytesEnd::new("Lap")))?;

    if let Some(notes) = a.notes.as_deref()
        && !notes.is_empty()
    {
        text_element(&mut xml, "Notes", notes)?;
    }

    xml.write_event(Event::End(BytesEnd::new("Activity")))?;
    xml.write_event(Event::End(BytesEnd::new("Activities")))?;
    xml.write_event(Event::End(BytesEnd::new("TrainingCenterDatabase")))?;

    Ok(())
}

fn text_element<W: io::Write>(xml: &mut Writer<W>, name: &str, text: &str) -> io::Result<()> {
    xml.write_event(Event::Start(BytesStart::new(name)))?;
    xml.write_event(Event::Text(BytesText::new(text)))?;
    xml.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::miles_to_meters;
    use chrono::{TimeZone, Utc};
    use tempfile::TempDir;

    fn sample(avg_hr: Option<u32>, notes: Option<&str>) -> ResolvedActivity {
        ResolvedActivity {
            start: Utc.with_ymd_and_hms(2024, 6, 1, 17, 0, 0).unwrap(),
            duration_s: 1488,
            distance_m: miles_to_meters(3.1),
            sport: "Running".to_string(),
            avg_hr,
            notes: notes.map(str::to_string),
        }
    }

    fn render_str(a: &ResolvedActivity) -> String {
        String::from_utf8(render(a).unwrap()).unwrap()
    }

    #[test]
    fn document_structure_is_fixed() {
        let doc = render_str(&sample(Some(150), Some("generated workout - easy run")));

        assert!(doc.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(doc.contains(
            "xmlns=\"http://www.garmin.com/xmlschemas/TrainingCenterDatabase/v2\""
        ));
        assert!(doc.contains("xmlns:xsi=\"http://www.w3.org/2001/XMLSchema-instance\""));
        assert!(doc.contains("xsi:schemaLocation="));

        assert_eq!(doc.matches("<Activity ").count(), 1);
        assert_eq!(doc.matches("<Lap ").count(), 1);
        assert_eq!(doc.matches("<Trackpoint>").count(), 2);

        assert!(doc.contains("<Activity Sport=\"Running\">"));
        assert!(doc.contains("<Id>2024-06-01T17:00:00Z</Id>"));
        assert!(doc.contains("<Lap StartTime=\"2024-06-01T17:00:00Z\">"));
        assert!(doc.contains("<TotalTimeSeconds>1488</TotalTimeSeconds>"));
        assert!(doc.contains("<DistanceMeters>4988.97</DistanceMeters>"));
        assert!(doc.contains("<AverageHeartRateBpm><Value>150</Value></AverageHeartRateBpm>"));
        assert!(doc.contains("<Intensity>Active</Intensity>"));
        assert!(doc.contains("<TriggerMethod>Manual</TriggerMethod>"));
        assert!(doc.contains("<Notes>generated workout - easy run</Notes>"));

        // End trackpoint is start + duration.
        assert!(doc.contains("<Time>2024-06-01T17:24:48Z</Time>"));
    }

    #[test]
    fn optional_fields_are_omitted() {
        let doc = render_str(&sample(None, None));
        assert!(!doc.contains("AverageHeartRateBpm"));
        assert!(!doc.contains("<Notes>"));

        let doc = render_str(&sample(None, Some("")));
        assert!(!doc.contains("<Notes>"));
    }

    #[test]
    fn notes_text_is_escaped() {
        let doc = render_str(&sample(None, Some("fast & flat <5k>")));
        assert!(doc.contains("<Notes>fast &amp; flat &lt;5k&gt;</Notes>"));
    }

    #[test]
    fn rendering_is_deterministic() {
        let a = sample(Some(140), Some("x"));
        assert_eq!(render(&a).unwrap(), render(&a).unwrap());
    }

    #[test]
    fn write_overwrites_in_place() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("run.tcx");
        let a = sample(None, Some("note"));

        write(&path, &a)?;
        let first = std::fs::read(&path)?;
        write(&path, &a)?;
        let second = std::fs::read(&path)?;

        assert_eq!(first, second);
        assert_eq!(first, render(&a)?);
        Ok(())
    }

    #[test]
    fn write_fails_without_parent_dir() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("run.tcx");
        assert!(matches!(
            write(&path, &sample(None, None)),
            Err(TcxError::Io { .. })
        ));
    }
}
