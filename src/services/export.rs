//! Export service implementation
//!
//! CSV roster/attendance exports, QR badge rendering, and the zipped QR
//! bundle download. The attendance CSV carries the school-form metadata
//! header rows (school name/ID, school year, month, grade & section) ahead
//! of the per-day columns.

use std::collections::HashMap;
use std::io::Write;

use chrono::{Datelike, NaiveDate};
use qrcode::render::svg;
use qrcode::QrCode;
use zip::write::FileOptions;
use zip::ZipWriter;

use crate::models::attendance::{AbsentRecord, PresentRecord};
use crate::models::school::SchoolConfig;
use crate::models::student::Student;
use crate::utils::errors::{OpenAttendanceError, Result};

/// Export service for CSV and QR artifacts
#[derive(Debug, Clone, Default)]
pub struct ExportService;

impl ExportService {
    pub fn new() -> Self {
        Self
    }

    /// Student roster CSV
    pub fn roster_csv(&self, students: &[Student]) -> Result<Vec<u8>> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record([
            "student_id",
            "last_name",
            "first_name",
            "middle_name",
            "section",
            "gender",
            "status",
            "emergency_contact_name",
            "emergency_contact_phone",
        ])?;

        for student in students {
            writer.write_record([
                student.student_id.as_str(),
                student.last_name.as_deref().unwrap_or(""),
                student.first_name.as_str(),
                student.middle_name.as_deref().unwrap_or(""),
                student.classroom_section.as_deref().unwrap_or(""),
                student.gender.as_deref().unwrap_or(""),
                student.status.as_str(),
                student.emergency_contact_name.as_deref().unwrap_or(""),
                student.emergency_contact_phone.as_deref().unwrap_or(""),
            ])?;
        }

        writer
            .into_inner()
            .map_err(|e| OpenAttendanceError::Config(format!("CSV buffer error: {e}")))
    }

    /// Daily attendance CSV for a section and date range, with metadata
    /// header rows preceding the table
    pub fn attendance_csv(
        &self,
        config: Option<&SchoolConfig>,
        section: &str,
        grade_level: Option<i32>,
        from: NaiveDate,
        to: NaiveDate,
        students: &[Student],
        present: &[PresentRecord],
        absent: &[AbsentRecord],
    ) -> Result<Vec<u8>> {
        if to < from {
            return Err(OpenAttendanceError::InvalidInput(
                "date range end precedes start".to_string(),
            ));
        }

        let mut writer = csv::WriterBuilder::new()
            .flexible(true)
            .from_writer(Vec::new());

        let school_name = config.map(|c| c.school_name.clone()).unwrap_or_default();
        let school_id = config
            .and_then(|c| c.school_id.clone())
            .unwrap_or_default();
        let school_year = config
            .and_then(|c| c.school_year.clone())
            .unwrap_or_default();
        let month = format!("{:04}-{:02}", from.year(), from.month());
        let grade_section = match grade_level {
            Some(grade) => format!("Grade {grade} - {section}"),
            None => section.to_string(),
        };

        writer.write_record(["School Name:", &school_name, "School ID:", &school_id])?;
        writer.write_record(["School Year:", &school_year, "Month:", &month])?;
        writer.write_record(["Grade & Section:", &grade_section, "", ""])?;

        let days: Vec<NaiveDate> = from.iter_days().take_while(|d| *d <= to).collect();
        let mut header = vec!["student_id".to_string(), "name".to_string()];
        header.extend(days.iter().map(|d| d.format("%d").to_string()));
        writer.write_record(&header)?;

        let mut present_map: HashMap<(&str, NaiveDate), &PresentRecord> = HashMap::new();
        for record in present {
            present_map.insert((record.student_id.as_str(), record.attendance_date), record);
        }
        let mut absent_map: HashMap<(&str, NaiveDate), &AbsentRecord> = HashMap::new();
        for record in absent {
            absent_map.insert((record.student_id.as_str(), record.absent_date), record);
        }

        for student in students {
            let mut row = vec![student.student_id.clone(), student.full_name()];
            for day in &days {
                let key = (student.student_id.as_str(), *day);
                let mark = if present_map.contains_key(&key) {
                    "P"
                } else if absent_map.contains_key(&key) {
                    "A"
                } else {
                    ""
                };
                row.push(mark.to_string());
            }
            writer.write_record(&row)?;
        }

        writer
            .into_inner()
            .map_err(|e| OpenAttendanceError::Config(format!("CSV buffer error: {e}")))
    }

    /// Render a student's QR badge as an SVG document
    pub fn qr_svg(&self, token: &str) -> Result<String> {
        let code = QrCode::new(token.as_bytes())
            .map_err(|e| OpenAttendanceError::InvalidInput(format!("QR encoding failed: {e}")))?;
        let image = code
            .render::<svg::Color>()
            .min_dimensions(256, 256)
            .dark_color(svg::Color("#000000"))
            .light_color(svg::Color("#ffffff"))
            .build();
        Ok(image)
    }

    /// Zip archive of QR badges for every student that has a token
    pub fn qr_bundle_zip(&self, students: &[Student]) -> Result<Vec<u8>> {
        let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
        let options = FileOptions::default().compression_method(zip::CompressionMethod::Deflated);

        for student in students {
            let Some(token) = student.qr_code_token.as_deref() else {
                continue;
            };
            let svg = self.qr_svg(token)?;
            zip.start_file(format!("{}.svg", student.student_id), options)?;
            zip.write_all(svg.as_bytes())?;
        }

        let cursor = zip.finish()?;
        Ok(cursor.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn student(id: &str, first: &str, last: &str, token: Option<&str>) -> Student {
        Student {
            id: 0,
            student_id: id.into(),
            last_name: Some(last.into()),
            first_name: first.into(),
            middle_name: None,
            phone_number: None,
            address: None,
            emergency_contact_name: None,
            emergency_contact_phone: None,
            emergency_contact_relationship: None,
            qr_code_token: token.map(Into::into),
            profile_image_path: None,
            classroom_section: Some("Agimat".into()),
            status: "Active".into(),
            gender: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_roster_csv_contains_students() {
        let service = ExportService::new();
        let students = vec![student("S-1", "Ana", "Reyes", None)];
        let csv = String::from_utf8(service.roster_csv(&students).unwrap()).unwrap();
        assert!(csv.starts_with("student_id,"));
        assert!(csv.contains("S-1,Reyes,Ana"));
    }

    #[test]
    fn test_attendance_csv_metadata_and_marks() {
        let service = ExportService::new();
        let students = vec![student("S-1", "Ana", "Reyes", None)];
        let from = NaiveDate::from_ymd_opt(2026, 2, 2).unwrap();
        let to = NaiveDate::from_ymd_opt(2026, 2, 4).unwrap();
        let present = vec![PresentRecord {
            present_id: 1,
            student_id: "S-1".into(),
            staff_id: "T-1".into(),
            attendance_date: from,
            time_in: Utc::now(),
            time_out: None,
            time_in_client: None,
            time_out_client: None,
            location: None,
        }];
        let absent = vec![AbsentRecord {
            absent_id: 1,
            student_id: "S-1".into(),
            staff_id: None,
            reason: None,
            absent_date: NaiveDate::from_ymd_opt(2026, 2, 3).unwrap(),
            absent_datetime: Utc::now(),
        }];

        let csv = String::from_utf8(
            service
                .attendance_csv(None, "Agimat", Some(10), from, to, &students, &present, &absent)
                .unwrap(),
        )
        .unwrap();

        assert!(csv.contains("Grade & Section:,Grade 10 - Agimat"));
        assert!(csv.contains("Month:,2026-02"));
        // P for the 2nd, A for the 3rd, blank for the 4th
        assert!(csv.contains("S-1,\"Reyes, Ana\",P,A,"));
    }

    #[test]
    fn test_attendance_csv_rejects_inverted_range() {
        let service = ExportService::new();
        let from = NaiveDate::from_ymd_opt(2026, 2, 4).unwrap();
        let to = NaiveDate::from_ymd_opt(2026, 2, 2).unwrap();
        let result = service.attendance_csv(None, "Agimat", None, from, to, &[], &[], &[]);
        assert!(result.is_err());
    }

    #[test]
    fn test_qr_svg_renders() {
        let service = ExportService::new();
        let svg = service.qr_svg("OA-test-token").unwrap();
        assert!(svg.contains("<svg"));
    }

    #[test]
    fn test_qr_bundle_skips_students_without_tokens() {
        let service = ExportService::new();
        let students = vec![
            student("S-1", "Ana", "Reyes", Some("OA-token-1")),
            student("S-2", "Ben", "Cruz", None),
        ];
        let bytes = service.qr_bundle_zip(&students).unwrap();
        let reader = zip::ZipArchive::new(std::io::Cursor::new(bytes)).unwrap();
        assert_eq!(reader.len(), 1);
    }
}
