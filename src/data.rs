use crate::error::RosterError;
use crate::model::{Grade, Student};
use csv::{Reader, Writer};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::{Read, Write};
use std::path::Path;

/// One row of the flat roster export: a student joined with one grade.
#[derive(Debug, Serialize, Deserialize)]
struct FlatGradeRow {
    student_id: String,
    student_name: String,
    #[serde(default)]
    gender: Option<String>,
    #[serde(default)]
    age: Option<u32>,
    subject_name: String,
    prev_gpa: f64,
    current_gpa: f64,
    attendance_pct: f64,
    assignment_rate: f64,
    #[serde(default)]
    participation_score: Option<f64>,
}

/// Load a roster file, choosing the format by extension (`.csv` or `.json`).
pub fn load_roster(path: impl AsRef<Path>) -> Result<Vec<Student>, RosterError> {
    let path = path.as_ref();
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("csv") => {
            let rdr = Reader::from_path(path)?;
            load_flat_csv(rdr)
        }
        Some("json") => {
            let file = std::fs::File::open(path)?;
            Ok(serde_json::from_reader(std::io::BufReader::new(file))?)
        }
        _ => Err(RosterError::UnsupportedFile(path.display().to_string())),
    }
}

/// Nest flat (student, grade) rows into students.
///
/// Students keep first-seen order, grades keep row order.
pub fn load_flat_csv<R: Read>(mut rdr: Reader<R>) -> Result<Vec<Student>, RosterError> {
    let mut students: Vec<Student> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for result in rdr.deserialize() {
        let row: FlatGradeRow = result?;
        let slot = match index.get(&row.student_id) {
            Some(&slot) => slot,
            None => {
                students.push(Student {
                    student_id: row.student_id.clone(),
                    student_name: row.student_name,
                    gender: row.gender,
                    age: row.age,
                    grades: Vec::new(),
                });
                index.insert(row.student_id, students.len() - 1);
                students.len() - 1
            }
        };

        students[slot].grades.push(Grade {
            subject_name: row.subject_name,
            prev_gpa: row.prev_gpa,
            current_gpa: row.current_gpa,
            attendance_pct: row.attendance_pct,
            assignment_rate: row.assignment_rate,
            participation_score: row.participation_score,
        });
    }

    Ok(students)
}

/// Flatten students back into one row per grade.
pub fn write_flat_csv<W: Write>(mut wtr: Writer<W>, students: &[Student]) -> Result<(), RosterError> {
    for student in students {
        for grade in &student.grades {
            wtr.serialize(FlatGradeRow {
                student_id: student.student_id.clone(),
                student_name: student.student_name.clone(),
                gender: student.gender.clone(),
                age: student.age,
                subject_name: grade.subject_name.clone(),
                prev_gpa: grade.prev_gpa,
                current_gpa: grade.current_gpa,
                attendance_pct: grade.attendance_pct,
                assignment_rate: grade.assignment_rate,
                participation_score: grade.participation_score,
            })?;
        }
    }
    wtr.flush()?;
    Ok(())
}

pub fn save_flat_csv(path: impl AsRef<Path>, students: &[Student]) -> Result<(), RosterError> {
    write_flat_csv(Writer::from_path(path)?, students)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FLAT: &str = "\
student_id,student_name,gender,age,subject_name,prev_gpa,current_gpa,attendance_pct,assignment_rate,participation_score
23WU000001,Diya Sharma,Female,19,Operating Systems,6.1,6.4,81,72,66
23WU000002,Kabir Shah,Male,20,Operating Systems,4.2,4.0,55,50,40
23WU000001,Diya Sharma,Female,19,Computer Networks,7.0,7.3,85,80,70
";

    #[test]
    fn test_flat_rows_are_nested_by_student() {
        let students = load_flat_csv(Reader::from_reader(FLAT.as_bytes())).unwrap();

        assert_eq!(students.len(), 2);
        assert_eq!(students[0].student_id, "23WU000001");
        assert_eq!(students[0].grades.len(), 2);
        assert_eq!(students[0].grades[1].subject_name, "Computer Networks");
        assert_eq!(students[1].student_name, "Kabir Shah");
        assert_eq!(students[1].age, Some(20));
    }

    #[test]
    fn test_optional_columns_may_be_empty() {
        let flat = "\
student_id,student_name,gender,age,subject_name,prev_gpa,current_gpa,attendance_pct,assignment_rate,participation_score
S1,Ansh Iyer,,,Discrete Mathematics,5.0,5.2,70,65,
";
        let students = load_flat_csv(Reader::from_reader(flat.as_bytes())).unwrap();
        assert_eq!(students[0].gender, None);
        assert_eq!(students[0].grades[0].participation_score, None);
    }

    #[test]
    fn test_malformed_number_is_an_error() {
        let flat = "\
student_id,student_name,gender,age,subject_name,prev_gpa,current_gpa,attendance_pct,assignment_rate,participation_score
S1,Ansh Iyer,,,Discrete Mathematics,abc,5.2,70,65,
";
        let result = load_flat_csv(Reader::from_reader(flat.as_bytes()));
        assert!(matches!(result, Err(RosterError::Csv(_))));
    }

    #[test]
    fn test_saved_roster_loads_back() {
        let students = load_flat_csv(Reader::from_reader(FLAT.as_bytes())).unwrap();
        let file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();

        save_flat_csv(file.path(), &students).unwrap();

        assert_eq!(load_roster(file.path()).unwrap(), students);
    }

    #[test]
    fn test_unknown_extension_is_rejected() {
        let result = load_roster("roster.xml");
        assert!(matches!(result, Err(RosterError::UnsupportedFile(_))));
    }
}
