use crate::symbolic::complex_core::ComplexCore;
use csv::Writer;
use nalgebra::DVector;
use num_complex::Complex64;
use std::fs::File;
use std::io::{self, Write};

const HEADERS: [&str; 4] = ["name", "re", "im", "magnitude"];

fn solution_rows<'a>(
    solution: &'a DVector<Complex64>,
    names: &'a [String],
) -> io::Result<impl Iterator<Item = [String; 4]> + 'a> {
    if names.len() != solution.len() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{} names for {} unknowns", names.len(), solution.len()),
        ));
    }
    Ok(names.iter().zip(solution.iter()).map(|(name, value)| {
        [
            name.clone(),
            value.re.to_string(),
            value.im.to_string(),
            value.magnitude().to_string(),
        ]
    }))
}

/// tab-separated table: one line per unknown
pub fn save_solution_to_file(
    solution: &DVector<Complex64>,
    names: &[String],
    filename: &str,
) -> io::Result<()> {
    let rows = solution_rows(solution, names)?;
    let mut file = File::create(filename)?;
    writeln!(file, "{}", HEADERS.join("\t"))?;
    for row in rows {
        writeln!(file, "{}", row.join("\t"))?;
    }
    Ok(())
}

pub fn save_solution_to_csv(
    solution: &DVector<Complex64>,
    names: &[String],
    filename: &str,
) -> io::Result<()> {
    let rows = solution_rows(solution, names)?;
    let mut writer = Writer::from_writer(File::create(filename)?);
    writer.write_record(HEADERS)?;
    for row in rows {
        writer.write_record(&row)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn sample() -> (DVector<Complex64>, Vec<String>) {
        (
            DVector::from_vec(vec![Complex64::new(3.0, 4.0), Complex64::new(-0.5, 0.0)]),
            vec!["u1".to_string(), "u2".to_string()],
        )
    }

    #[test]
    fn test_save_solution_to_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("solution.txt");
        let (solution, names) = sample();
        save_solution_to_file(&solution, &names, path.to_str().unwrap()).unwrap();
        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "name\tre\tim\tmagnitude\nu1\t3\t4\t5\nu2\t-0.5\t0\t0.5\n");
    }

    #[test]
    fn test_save_solution_to_csv() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("solution.csv");
        let (solution, names) = sample();
        save_solution_to_csv(&solution, &names, path.to_str().unwrap()).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert_eq!(headers.iter().collect::<Vec<_>>(), HEADERS.to_vec());
        let records: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(records.len(), 2);
        assert_eq!(&records[0][0], "u1");
        assert_eq!(records[0][3].parse::<f64>().unwrap(), 5.0);
        assert_eq!(&records[1][1], "-0.5");
    }

    #[test]
    fn test_names_must_match_solution() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("solution.txt");
        let (solution, _) = sample();
        let result = save_solution_to_file(&solution, &["only".to_string()], path.to_str().unwrap());
        assert_eq!(result.unwrap_err().kind(), io::ErrorKind::InvalidInput);
        assert!(!path.exists());
    }
}
