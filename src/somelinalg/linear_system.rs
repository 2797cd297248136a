//! # Linear system driver
//!
//! `LinearSystem` owns a complex system `A·x = b` together with its `SolverConfig`, runs one of
//! the two Gauss-Jordan engines, sets up logging and reports calculation statistics.
//! A system can be built directly from nalgebra containers or from a task document
//! (see `Utils::task_parser`):
//! ```text
//! solver
//! method: symbolic
//! loglevel: off
//! system
//! unknowns: u1, u2
//! row0: 2, -1
//! row1: -1, 2+1i
//! free_terms: 1, 0
//! ```
use crate::Utils::logger::{save_solution_to_csv, save_solution_to_file};
use crate::Utils::task_parser::{
    DocumentMap, SectionMap, Value, parse_document_as, parse_document_as_strings, read_task_file,
    section_template,
};
use crate::somelinalg::gauss_jordan_numeric;
use crate::somelinalg::gauss_jordan_symbolic;
use crate::somelinalg::linear_sys_diagnostics::residual_norm;
use crate::somelinalg::linear_sys_error::LinearSystemError;
use crate::symbolic::expression::{Expression, constant_matrix, constant_vector, evaluate_vector};
use chrono::Local;
use log::{LevelFilter, info, warn};
use nalgebra::{DMatrix, DVector};
use num_complex::Complex64;
use simplelog::{
    ColorChoice, CombinedLogger, Config, SharedLogger, TermLogger, TerminalMode, WriteLogger,
};
use std::collections::HashMap;
use std::fs::File;
use std::io;
use std::path::Path;
use std::str::FromStr;
use std::time::Instant;
use strum_macros::{Display, EnumIter, EnumString};
use tabled::{builder::Builder, settings::Style};

const SOLVER_SECTION: &str = "solver";
const SYSTEM_SECTION: &str = "system";
const SOLVER_KEYS: [&str; 4] = ["method", "ignore_identity_equations", "loglevel", "log_to_file"];

/// which elimination engine solves the system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SolverMethod {
    /// generic engine over expression trees: the coefficients become constant leaves
    Symbolic,
    /// complex engine with partial pivoting and optional identity equation removal
    #[default]
    Numeric,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SolverConfig {
    pub method: SolverMethod,
    /// remove `0 = 0` equations before solving; only the numeric engine supports it
    pub ignore_identity_equations: bool,
    /// debug, info, warn, error, or off/none; `None` means info
    pub loglevel: Option<String>,
    pub log_to_file: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig {
            method: SolverMethod::Numeric,
            ignore_identity_equations: false,
            loglevel: Some("info".to_string()),
            log_to_file: false,
        }
    }
}

fn single_value<'a>(
    section: &'a SectionMap,
    key: &str,
) -> Result<Option<&'a Value>, LinearSystemError> {
    match section.get(key) {
        Some(Some(values)) if values.len() == 1 => Ok(Some(&values[0])),
        Some(Some(values)) => Err(LinearSystemError::InvalidTask(format!(
            "key '{}' expects a single value, got {}",
            key,
            values.len()
        ))),
        _ => Ok(None),
    }
}

fn boolean_value(section: &SectionMap, key: &str) -> Result<Option<bool>, LinearSystemError> {
    single_value(section, key)?
        .map(|value| {
            value.as_boolean().ok_or_else(|| {
                LinearSystemError::InvalidTask(format!(
                    "key '{}' must be true or false, got '{}'",
                    key, value
                ))
            })
        })
        .transpose()
}

impl SolverConfig {
    /// Reads the `solver` section of a task document; missing keys keep their defaults.
    pub fn from_section(section: &SectionMap) -> Result<Self, LinearSystemError> {
        if let Some(unknown) = section.keys().find(|key| !SOLVER_KEYS.contains(&key.as_str())) {
            return Err(LinearSystemError::InvalidTask(format!(
                "unknown key '{}' in section '{}'",
                unknown, SOLVER_SECTION
            )));
        }
        let mut config = SolverConfig::default();
        if let Some(value) = single_value(section, "method")? {
            config.method = SolverMethod::from_str(&value.to_string()).map_err(|_| {
                LinearSystemError::InvalidTask(format!(
                    "unknown method '{}', expected symbolic or numeric",
                    value
                ))
            })?;
        }
        if let Some(flag) = boolean_value(section, "ignore_identity_equations")? {
            config.ignore_identity_equations = flag;
        }
        if let Some(value) = single_value(section, "loglevel")? {
            config.loglevel = Some(value.to_string().to_lowercase());
        }
        if let Some(flag) = boolean_value(section, "log_to_file")? {
            config.log_to_file = flag;
        }
        config.log_level_filter()?;
        Ok(config)
    }

    /// `None` when logging is disabled; the level name is case-insensitive
    pub fn log_level_filter(&self) -> Result<Option<LevelFilter>, LinearSystemError> {
        let level = self.loglevel.as_deref().map(str::to_lowercase);
        match level.as_deref() {
            None => Ok(Some(LevelFilter::Info)),
            Some("off") | Some("none") => Ok(None),
            Some("debug") => Ok(Some(LevelFilter::Debug)),
            Some("info") => Ok(Some(LevelFilter::Info)),
            Some("warn") => Ok(Some(LevelFilter::Warn)),
            Some("error") => Ok(Some(LevelFilter::Error)),
            Some(other) => Err(LinearSystemError::InvalidTask(format!(
                "loglevel must be debug, info, warn, error or off, got '{}'",
                other
            ))),
        }
    }
}

/// template of a task document: every key the driver understands
pub fn task_template() -> DocumentMap {
    let mut template = HashMap::new();
    template.insert(SOLVER_SECTION.to_string(), section_template(&SOLVER_KEYS));
    template.insert(
        SYSTEM_SECTION.to_string(),
        section_template(&["free_terms", "unknowns"]),
    );
    template
}

fn complex_values(key: &str, values: &[Value]) -> Result<Vec<Complex64>, LinearSystemError> {
    values
        .iter()
        .map(|value| {
            value.as_complex().ok_or_else(|| {
                LinearSystemError::InvalidTask(format!(
                    "'{}' in '{}' is not a number",
                    value, key
                ))
            })
        })
        .collect()
}

/// row index of a `rowN` key
fn row_index(key: &str) -> Option<usize> {
    key.strip_prefix("row")?.parse::<usize>().ok()
}

/// Builds the coefficient matrix from the `rowN` keys of the `system` section
fn coefficients_from_section(section: &SectionMap) -> Result<DMatrix<Complex64>, LinearSystemError> {
    let mut rows: Vec<(usize, Vec<Complex64>)> = Vec::new();
    for (key, values) in section {
        if key == "free_terms" || key == "unknowns" {
            continue;
        }
        let index = row_index(key).ok_or_else(|| {
            LinearSystemError::InvalidTask(format!(
                "unknown key '{}' in section '{}'",
                key, SYSTEM_SECTION
            ))
        })?;
        let values = values.as_deref().unwrap_or(&[]);
        rows.push((index, complex_values(key, values)?));
    }
    rows.sort_by_key(|(index, _)| *index);
    if rows.iter().enumerate().any(|(k, (index, _))| k != *index) {
        return Err(LinearSystemError::InvalidTask(format!(
            "rows must be numbered row0..row{}",
            rows.len().saturating_sub(1)
        )));
    }
    let ncols = rows.first().map(|(_, row)| row.len()).unwrap_or(0);
    if ncols == 0 {
        return Err(LinearSystemError::InvalidTask(format!(
            "section '{}' has no coefficients",
            SYSTEM_SECTION
        )));
    }
    if let Some((index, row)) = rows.iter().find(|(_, row)| row.len() != ncols) {
        return Err(LinearSystemError::InvalidTask(format!(
            "row{} has {} coefficients, row0 has {}",
            index,
            row.len(),
            ncols
        )));
    }
    let nrows = rows.len();
    let flat: Vec<Complex64> = rows.into_iter().flat_map(|(_, row)| row).collect();
    Ok(DMatrix::from_row_slice(nrows, ncols, &flat))
}

pub struct LinearSystem {
    pub coefficients: DMatrix<Complex64>,
    pub free_terms: DVector<Complex64>,
    /// names of the unknowns, used in reports and saved files
    pub unknowns: Vec<String>,
    pub config: SolverConfig,
    result: Option<DVector<Complex64>>,
    symbolic_result: Option<DVector<Expression>>,
    identity_equations: Vec<usize>,
    residual: Option<f64>,
    calc_statistics: HashMap<String, String>,
}

impl LinearSystem {
    /// Checks the dimensions and names the unknowns `x0, x1, ...`.
    pub fn new(
        coefficients: DMatrix<Complex64>,
        free_terms: DVector<Complex64>,
        config: SolverConfig,
    ) -> Result<Self, LinearSystemError> {
        LinearSystemError::check_dimensions(coefficients.shape(), free_terms.len())?;
        config.log_level_filter()?;
        let unknowns = (0..free_terms.len()).map(|i| format!("x{}", i)).collect();
        Ok(LinearSystem {
            coefficients,
            free_terms,
            unknowns,
            config,
            result: None,
            symbolic_result: None,
            identity_equations: Vec::new(),
            residual: None,
            calc_statistics: HashMap::new(),
        })
    }

    pub fn set_unknowns(&mut self, unknowns: Vec<String>) -> Result<(), LinearSystemError> {
        if unknowns.len() != self.free_terms.len() {
            return Err(LinearSystemError::InvalidTask(format!(
                "{} names given for {} unknowns",
                unknowns.len(),
                self.free_terms.len()
            )));
        }
        self.unknowns = unknowns;
        Ok(())
    }

    /// Builds a system from a parsed task document. Names of the unknowns are taken from the
    /// parsed values, so a name that reads as a number (`i`, `e1`) comes back in its numeric form;
    /// `from_task` keeps them as written.
    pub fn from_document(document: &DocumentMap) -> Result<Self, LinearSystemError> {
        let config = match document.get(SOLVER_SECTION) {
            Some(section) => SolverConfig::from_section(section)?,
            None => SolverConfig::default(),
        };
        let section = document.get(SYSTEM_SECTION).ok_or_else(|| {
            LinearSystemError::InvalidTask(format!("section '{}' is missing", SYSTEM_SECTION))
        })?;
        let coefficients = coefficients_from_section(section)?;
        let free_terms = match section.get("free_terms") {
            Some(Some(values)) => DVector::from_vec(complex_values("free_terms", values)?),
            _ => {
                return Err(LinearSystemError::InvalidTask(
                    "key 'free_terms' is missing".to_string(),
                ));
            }
        };
        let mut system = LinearSystem::new(coefficients, free_terms, config)?;
        if let Some(Some(names)) = section.get("unknowns") {
            system.set_unknowns(names.iter().map(|name| name.to_string()).collect())?;
        }
        Ok(system)
    }

    /// Builds a system from the text of a task document
    pub fn from_task(task: &str) -> Result<Self, LinearSystemError> {
        let document =
            parse_document_as(task, Some(task_template())).map_err(LinearSystemError::InvalidTask)?;
        let mut system = Self::from_document(&document)?;
        let raw = parse_document_as_strings(task).map_err(LinearSystemError::InvalidTask)?;
        if let Some(Some(names)) = raw.get(SYSTEM_SECTION).and_then(|section| section.get("unknowns")) {
            system.set_unknowns(names.clone())?;
        }
        Ok(system)
    }

    pub fn from_task_file<P: AsRef<Path>>(path: P) -> Result<Self, LinearSystemError> {
        let task = read_task_file(path).map_err(LinearSystemError::InvalidTask)?;
        Self::from_task(&task)
    }

    /// Solves the system with the configured engine, without touching the logger setup.
    pub fn solver(&mut self) -> Result<DVector<Complex64>, LinearSystemError> {
        self.calc_statistics.clear();
        let begin = Instant::now();
        let solution = match self.config.method {
            SolverMethod::Numeric => self.solve_numeric()?,
            SolverMethod::Symbolic => self.solve_symbolic()?,
        };
        let elapsed = begin.elapsed();
        let residual = residual_norm(&self.coefficients, &solution, &self.free_terms);
        info!("system solved in {:?}, residual norm {:.3e}", elapsed, residual);

        self.calc_statistics
            .insert("number of equations".to_string(), self.free_terms.len().to_string());
        self.calc_statistics
            .insert("method".to_string(), self.config.method.to_string());
        self.calc_statistics.insert(
            "time elapsed, ms".to_string(),
            format!("{:.3}", elapsed.as_secs_f64() * 1e3),
        );
        self.calc_statistics
            .insert("residual norm".to_string(), format!("{:.3e}", residual));
        self.calc_statistics();

        self.residual = Some(residual);
        self.result = Some(solution.clone());
        Ok(solution)
    }

    fn solve_numeric(&mut self) -> Result<DVector<Complex64>, LinearSystemError> {
        self.identity_equations = if self.config.ignore_identity_equations {
            gauss_jordan_numeric::find_identity_equations(&self.coefficients, &self.free_terms)
        } else {
            Vec::new()
        };
        self.calc_statistics.insert(
            "identity equations removed".to_string(),
            self.identity_equations.len().to_string(),
        );
        gauss_jordan_numeric::solved(
            self.coefficients.clone(),
            self.free_terms.clone(),
            self.config.ignore_identity_equations,
        )
    }

    fn solve_symbolic(&mut self) -> Result<DVector<Complex64>, LinearSystemError> {
        if self.config.ignore_identity_equations {
            warn!("identity equations are not removed by the symbolic method, the flag is ignored");
        }
        self.identity_equations = Vec::new();
        let solution = gauss_jordan_symbolic::solved(
            constant_matrix(&self.coefficients),
            constant_vector(&self.free_terms),
        )?;
        let largest_tree = solution.iter().map(Expression::distinct_node_count).max().unwrap_or(0);
        self.calc_statistics
            .insert("largest solution tree, nodes".to_string(), largest_tree.to_string());
        let values = evaluate_vector(&solution);
        self.symbolic_result = Some(solution);
        Ok(values)
    }

    /// Wrapper around [`LinearSystem::solver`] that sets up logging first
    pub fn solve(&mut self) -> Result<DVector<Complex64>, LinearSystemError> {
        let Some(level) = self.config.log_level_filter()? else {
            return self.solver();
        };
        let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
            level,
            Config::default(),
            TerminalMode::Mixed,
            ColorChoice::Auto,
        )];
        if self.config.log_to_file {
            let name = format!("log_{}.txt", Local::now().format("%Y-%m-%d_%H-%M-%S"));
            match File::create(&name) {
                Ok(file) => loggers.push(WriteLogger::new(level, Config::default(), file)),
                Err(e) => eprintln!("cannot create log file {}: {}", name, e),
            }
        }
        // logger may already be set by an earlier solve
        let _ = CombinedLogger::init(loggers);
        info!("solving linear system with {} method", self.config.method);
        let result = self.solver();
        info!("program ended");
        result
    }

    fn calc_statistics(&self) {
        let mut stats: Vec<(&String, &String)> = self.calc_statistics.iter().collect();
        stats.sort();
        let mut builder = Builder::default();
        for (key, value) in stats {
            builder.push_record([key.clone(), value.clone()]);
        }
        let mut table = builder.build();
        table.with(Style::modern_rounded());
        info!("\n \n CALC STATISTICS \n \n {}", table);
    }

    pub fn get_result(&self) -> Option<DVector<Complex64>> {
        self.result.clone()
    }

    /// solution expressions of the last symbolic solve
    pub fn get_symbolic_result(&self) -> Option<&DVector<Expression>> {
        self.symbolic_result.as_ref()
    }

    pub fn identity_equations(&self) -> &[usize] {
        &self.identity_equations
    }

    pub fn residual(&self) -> Option<f64> {
        self.residual
    }

    pub fn statistics(&self) -> &HashMap<String, String> {
        &self.calc_statistics
    }

    /// Saves the result as CSV when the file name ends with `.csv`, tab-separated otherwise
    pub fn save_result(&self, filename: &str) -> io::Result<()> {
        let solution = self
            .result
            .as_ref()
            .ok_or_else(|| io::Error::other("the system is not solved yet"))?;
        if filename.ends_with(".csv") {
            save_solution_to_csv(solution, &self.unknowns, filename)
        } else {
            save_solution_to_file(solution, &self.unknowns, filename)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use strum::IntoEnumIterator;

    fn c(re: f64, im: f64) -> Complex64 {
        Complex64::new(re, im)
    }

    const IDENTITY_TASK: &str = r#"
    // disconnected nodes give 0 = 0 equations
    solver
    method: numeric
    ignore_identity_equations: true
    loglevel: off
    system
    row0: 1, 2, 0, 1, 0, 1
    row1: 1, 1, 0, 0, 0, 1
    row2: 0, 0, 0, 0, 0, 0
    row3: 1, 0, 0, 0, 0, 2
    row4: 0, 0, 0, 0, 0, 0
    row5: 2, 1, 0, 0, 0, 0
    free_terms: 0, 0, 0, 5, 0, 4
    "#;

    #[test]
    fn test_method_names() {
        let names: Vec<String> = SolverMethod::iter().map(|m| m.to_string()).collect();
        assert_eq!(names, vec!["symbolic", "numeric"]);
        assert_eq!(SolverMethod::from_str("Symbolic").unwrap(), SolverMethod::Symbolic);
        assert!(SolverMethod::from_str("cholesky").is_err());
    }

    #[test]
    fn test_log_levels() {
        let mut config = SolverConfig::default();
        assert_eq!(config.log_level_filter(), Ok(Some(LevelFilter::Info)));
        config.loglevel = Some("none".to_string());
        assert_eq!(config.log_level_filter(), Ok(None));
        config.loglevel = Some("debug".to_string());
        assert_eq!(config.log_level_filter(), Ok(Some(LevelFilter::Debug)));
        config.loglevel = None;
        assert_eq!(config.log_level_filter(), Ok(Some(LevelFilter::Info)));
        config.loglevel = Some("verbose".to_string());
        assert!(matches!(
            config.log_level_filter(),
            Err(LinearSystemError::InvalidTask(_))
        ));
    }

    #[test]
    fn test_log_level_is_case_insensitive() {
        let mut config = SolverConfig {
            loglevel: Some("Info".to_string()),
            ..SolverConfig::default()
        };
        assert_eq!(config.log_level_filter(), Ok(Some(LevelFilter::Info)));
        config.loglevel = Some("WARN".to_string());
        assert_eq!(config.log_level_filter(), Ok(Some(LevelFilter::Warn)));
        config.loglevel = Some("Off".to_string());
        assert_eq!(config.log_level_filter(), Ok(None));

        let system = LinearSystem::new(
            DMatrix::from_element(1, 1, c(2.0, 0.0)),
            DVector::from_element(1, c(1.0, 0.0)),
            SolverConfig {
                loglevel: Some("Info".to_string()),
                ..SolverConfig::default()
            },
        );
        assert!(system.is_ok());
    }

    #[test]
    fn test_identity_task() {
        let mut system = LinearSystem::from_task(IDENTITY_TASK).unwrap();
        assert_eq!(system.config.method, SolverMethod::Numeric);
        assert!(system.config.ignore_identity_equations);
        let x = system.solve().unwrap();
        assert_eq!(system.identity_equations(), &[2, 4]);
        let expected = [13.0 / 3.0, -14.0 / 3.0, 0.0, 14.0 / 3.0, 0.0, 1.0 / 3.0];
        for (k, value) in expected.iter().enumerate() {
            assert_relative_eq!(x[k].re, *value, epsilon = 1e-12);
        }
        assert!(system.residual().unwrap() < 1e-12);
        assert_eq!(system.statistics()["identity equations removed"], "2");
        assert_eq!(system.get_result(), Some(x));
    }

    #[test]
    fn test_symbolic_and_numeric_agree() {
        let task = |method: &str| {
            format!(
                "solver\nmethod: {}\nloglevel: off\nsystem\nunknowns: u1, u2\nrow0: 2, -1\nrow1: -1, 2+1i\nfree_terms: 1, 1i\n",
                method
            )
        };
        let mut numeric = LinearSystem::from_task(&task("numeric")).unwrap();
        let mut symbolic = LinearSystem::from_task(&task("symbolic")).unwrap();
        assert_eq!(symbolic.config.method, SolverMethod::Symbolic);
        assert_eq!(symbolic.unknowns, vec!["u1".to_string(), "u2".to_string()]);
        let x_numeric = numeric.solve().unwrap();
        let x_symbolic = symbolic.solve().unwrap();
        assert!((x_numeric - x_symbolic).norm() < 1e-12);
        assert!(numeric.get_symbolic_result().is_none());
        let expressions = symbolic.get_symbolic_result().unwrap();
        assert_eq!(expressions.len(), 2);
        assert!(symbolic.statistics().contains_key("largest solution tree, nodes"));
    }

    #[test]
    fn test_symbolic_method_ignores_identity_flag() {
        let task = IDENTITY_TASK.replace("method: numeric", "method: symbolic");
        let mut system = LinearSystem::from_task(&task).unwrap();
        assert!(matches!(
            system.solve(),
            Err(LinearSystemError::SingularSystem { .. })
        ));
        assert!(system.get_result().is_none());
    }

    #[test]
    fn test_unknown_names_are_kept_as_written() {
        let task = "system\nunknowns: i, j, e\nrow0: 1, 0, 0\nrow1: 0, 1, 0\nrow2: 0, 0, 1\nfree_terms: 1, 2, 3";
        let system = LinearSystem::from_task(task).unwrap();
        assert_eq!(system.unknowns, vec!["i", "j", "e"]);

        let task = "system\nunknowns: 1e3, inf\nrow0: 1, 0\nrow1: 0, 1\nfree_terms: 1, 2";
        let system = LinearSystem::from_task(task).unwrap();
        assert_eq!(system.unknowns, vec!["1e3", "inf"]);
    }

    #[test]
    fn test_from_task_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("task.txt");
        std::fs::write(
            &path,
            "solver\nloglevel: off\nsystem\nunknowns: i, j\nrow0: 1, 0\nrow1: 0, 2\nfree_terms: 1, 1",
        )
        .unwrap();
        let mut system = LinearSystem::from_task_file(&path).unwrap();
        assert_eq!(system.unknowns, vec!["i", "j"]);
        let x = system.solve().unwrap();
        assert_relative_eq!(x[1].re, 0.5, epsilon = 1e-12);
        assert!(matches!(
            LinearSystem::from_task_file(dir.path().join("missing.txt")),
            Err(LinearSystemError::InvalidTask(_))
        ));
    }

    #[test]
    fn test_inline_comments_in_task() {
        let task = "system ; two unknowns\nrow0: 1 ; diagonal\nfree_terms: 1 // right-hand side";
        let mut system = LinearSystem::from_task(task).unwrap();
        assert_eq!(system.coefficients[(0, 0)], c(1.0, 0.0));
        system.config.loglevel = Some("off".to_string());
        assert_eq!(system.solve().unwrap()[0], c(1.0, 0.0));
    }

    #[test]
    fn test_log_to_file_creates_timestamped_log() {
        let dir = tempfile::tempdir().unwrap();
        let previous = std::env::current_dir().unwrap();
        std::env::set_current_dir(dir.path()).unwrap();
        let mut system = LinearSystem::new(
            DMatrix::from_element(1, 1, c(2.0, 0.0)),
            DVector::from_element(1, c(4.0, 0.0)),
            SolverConfig {
                loglevel: Some("warn".to_string()),
                log_to_file: true,
                ..SolverConfig::default()
            },
        )
        .unwrap();
        let result = system.solve();
        std::env::set_current_dir(&previous).unwrap();

        assert_eq!(result.unwrap()[0], c(2.0, 0.0));
        let logs: Vec<String> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .filter(|name| name.starts_with("log_") && name.ends_with(".txt"))
            .collect();
        assert_eq!(logs.len(), 1, "{:?}", logs);
    }

    #[test]
    fn test_defaults_without_solver_section() {
        let system = LinearSystem::from_task("system\nrow0: 4\nfree_terms: 2").unwrap();
        assert_eq!(system.config, SolverConfig::default());
        assert_eq!(system.unknowns, vec!["x0".to_string()]);
        assert_eq!(system.coefficients[(0, 0)], c(4.0, 0.0));
    }

    #[test]
    fn test_invalid_tasks() {
        let invalid = [
            // unknown method
            "solver\nmethod: qr\nsystem\nrow0: 1\nfree_terms: 1",
            // ragged rows
            "system\nrow0: 1, 2\nrow1: 1\nfree_terms: 1, 1",
            // gap in row numbers
            "system\nrow0: 1, 0\nrow2: 0, 1\nfree_terms: 1, 1",
            // non-numeric coefficient
            "system\nrow0: one\nfree_terms: 1",
            // missing free terms
            "system\nrow0: 1",
            // missing system
            "solver\nmethod: numeric",
            // flag is not a boolean
            "solver\nignore_identity_equations: 1\nsystem\nrow0: 1\nfree_terms: 1",
            // unknown key
            "solver\ntolerance: 1e-6\nsystem\nrow0: 1\nfree_terms: 1",
            // wrong number of names
            "system\nunknowns: a, b\nrow0: 1\nfree_terms: 1",
        ];
        for task in invalid {
            assert!(
                matches!(LinearSystem::from_task(task), Err(LinearSystemError::InvalidTask(_))),
                "task should be rejected: {}",
                task
            );
        }
    }

    #[test]
    fn test_dimension_errors_from_task() {
        assert_eq!(
            LinearSystem::from_task("system\nrow0: 1, 2\nfree_terms: 1").err(),
            Some(LinearSystemError::NotSquare { rows: 1, cols: 2 })
        );
        assert_eq!(
            LinearSystem::from_task("system\nrow0: 1\nfree_terms: 1, 2").err(),
            Some(LinearSystemError::DimensionMismatch {
                equations: 1,
                free_terms: 2
            })
        );
    }

    #[test]
    fn test_save_result() {
        let dir = tempfile::tempdir().unwrap();
        let mut system = LinearSystem::new(
            DMatrix::from_row_slice(2, 2, &[c(2.0, 0.0), c(0.0, 0.0), c(0.0, 0.0), c(0.0, 1.0)]),
            DVector::from_vec(vec![c(4.0, 0.0), c(1.0, 0.0)]),
            SolverConfig {
                loglevel: Some("off".to_string()),
                ..SolverConfig::default()
            },
        )
        .unwrap();
        let path = dir.path().join("solution.csv");
        let filename = path.to_str().unwrap();
        assert!(system.save_result(filename).is_err());
        system.solve().unwrap();
        system.save_result(filename).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines[0], "name,re,im,magnitude");
        assert!(lines[1].starts_with("x0,2,0,2"));
        assert!(lines[2].starts_with("x1,0,-1,1"));
    }
}
