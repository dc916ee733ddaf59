//! Employee table schema and the embedded sample data.

use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use super::model::{Dataset, Record, Value};

pub const EMPLOYEE_ID: &str = "Employee_ID";
pub const GENDER: &str = "Gender";
pub const AGE: &str = "Age";
pub const JOB_TITLE: &str = "Job_Title";
pub const HIRE_DATE: &str = "Hire_Date";
pub const YEARS_AT_COMPANY: &str = "Years_At_Company";
pub const EDUCATION_LEVEL: &str = "Education_Level";
pub const PERFORMANCE_SCORE: &str = "Performance_Score";
pub const MONTHLY_SALARY: &str = "Monthly_Salary";
pub const WORK_HOURS_PER_WEEK: &str = "Work_Hours_Per_Week";
pub const SATISFACTION_SCORE: &str = "Employee_Satisfaction_Score";
pub const RESIGNED: &str = "Resigned";

/// Column order of the employee table.
pub const COLUMNS: [&str; 12] = [
    EMPLOYEE_ID,
    GENDER,
    AGE,
    JOB_TITLE,
    HIRE_DATE,
    YEARS_AT_COMPANY,
    EDUCATION_LEVEL,
    PERFORMANCE_SCORE,
    MONTHLY_SALARY,
    WORK_HOURS_PER_WEEK,
    SATISFACTION_SCORE,
    RESIGNED,
];

/// One typed employee row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    #[serde(rename = "Employee_ID")]
    pub id: i64,
    #[serde(rename = "Gender")]
    pub gender: String,
    #[serde(rename = "Age")]
    pub age: i64,
    #[serde(rename = "Job_Title")]
    pub job_title: String,
    /// `YYYY-MM-DD`.
    #[serde(rename = "Hire_Date")]
    pub hire_date: String,
    #[serde(rename = "Years_At_Company")]
    pub years_at_company: i64,
    #[serde(rename = "Education_Level")]
    pub education_level: String,
    #[serde(rename = "Performance_Score")]
    pub performance_score: i64,
    #[serde(rename = "Monthly_Salary")]
    pub monthly_salary: i64,
    #[serde(rename = "Work_Hours_Per_Week")]
    pub work_hours_per_week: i64,
    #[serde(rename = "Employee_Satisfaction_Score")]
    pub satisfaction_score: f64,
    /// Stored as 0/1 like the source table.
    #[serde(rename = "Resigned")]
    pub resigned: i64,
}

impl Employee {
    pub fn to_record(&self) -> Record {
        [
            (EMPLOYEE_ID, Value::Integer(self.id)),
            (GENDER, Value::from(self.gender.as_str())),
            (AGE, Value::Integer(self.age)),
            (JOB_TITLE, Value::from(self.job_title.as_str())),
            (HIRE_DATE, Value::Date(self.hire_date.clone())),
            (YEARS_AT_COMPANY, Value::Integer(self.years_at_company)),
            (EDUCATION_LEVEL, Value::from(self.education_level.as_str())),
            (PERFORMANCE_SCORE, Value::Integer(self.performance_score)),
            (MONTHLY_SALARY, Value::Integer(self.monthly_salary)),
            (WORK_HOURS_PER_WEEK, Value::Integer(self.work_hours_per_week)),
            (SATISFACTION_SCORE, Value::Float(self.satisfaction_score)),
            (RESIGNED, Value::Integer(self.resigned)),
        ]
        .into_iter()
        .collect()
    }
}

/// Build a dataset in employee column order.
pub fn employee_dataset(employees: &[Employee]) -> Dataset {
    Dataset::with_columns(
        COLUMNS.iter().map(|c| c.to_string()).collect(),
        employees.iter().map(Employee::to_record).collect(),
    )
}

#[allow(clippy::too_many_arguments)]
fn employee(
    id: i64,
    gender: &str,
    age: i64,
    job_title: &str,
    hire_date: &str,
    years_at_company: i64,
    education_level: &str,
    performance_score: i64,
    monthly_salary: i64,
    work_hours_per_week: i64,
    satisfaction_score: f64,
) -> Employee {
    Employee {
        id,
        gender: gender.to_string(),
        age,
        job_title: job_title.to_string(),
        hire_date: hire_date.to_string(),
        years_at_company,
        education_level: education_level.to_string(),
        performance_score,
        monthly_salary,
        work_hours_per_week,
        satisfaction_score,
        resigned: 0,
    }
}

/// The five-row sample table the dashboard ships with.
pub fn sample_employees() -> Vec<Employee> {
    vec![
        employee(101, "Male", 29, "Software Engineer", "2019-06-15", 4, "Master's", 3, 75000, 40, 4.2),
        employee(102, "Female", 34, "Data Scientist", "2017-09-23", 6, "PhD", 4, 95000, 45, 4.5),
        employee(103, "Male", 27, "System Analyst", "2021-02-11", 2, "Bachelor's", 2, 60000, 38, 3.8),
        employee(104, "Female", 40, "HR Manager", "2015-12-05", 9, "Master's", 5, 105000, 42, 4.9),
        employee(105, "Male", 31, "Project Manager", "2018-07-19", 5, "Master's", 4, 88000, 44, 4.3),
    ]
}

static SAMPLE: OnceLock<Dataset> = OnceLock::new();

/// The sample table as a dataset, built once per process.
pub fn sample_dataset() -> &'static Dataset {
    SAMPLE.get_or_init(|| {
        let ds = employee_dataset(&sample_employees());
        log::debug!("built sample dataset with {} records", ds.len());
        ds
    })
}
