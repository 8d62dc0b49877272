//! Complaint visibility scope.
//!
//! One authoritative policy decides which complaints an actor may see,
//! applied identically to the list query and the single-complaint fetch.
//! The rules, by admin position:
//!
//! | position               | required attribute | visible complaints        |
//! |------------------------|--------------------|---------------------------|
//! | `lecturer`             | courses            | course in the actor's set |
//! | `hod`                  | department         | matching department       |
//! | `dean`                 | faculty            | matching faculty          |
//! | `system-administrator` | none               | all                       |
//! | anything else          |                    | none                      |
//!
//! A missing or empty required attribute means the admin sees nothing,
//! never everything. Students bypass the table entirely and see only
//! their own complaints. A single-item fetch outside the scope surfaces
//! as `NotFound`, so unauthorized actors cannot probe which complaints
//! exist.

use examdesk_db::entities::complaint;
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, Condition};

use crate::session::SessionActor;

/// The set of complaints an actor may see.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComplaintScope {
    /// Every complaint (system administrators).
    All,
    /// Complaints whose course is in this set (lecturers).
    Courses(Vec<String>),
    /// Complaints in this department (heads of department).
    Department(String),
    /// Complaints in this faculty (deans).
    Faculty(String),
    /// Complaints owned by this user (students).
    Owner(String),
    /// No complaints at all.
    Nothing,
}

impl ComplaintScope {
    /// Resolve the scope for a session actor.
    #[must_use]
    pub fn for_actor(actor: &SessionActor) -> Self {
        if actor.is_student() {
            return Self::Owner(actor.user_id.clone());
        }
        if !actor.is_admin() {
            return Self::Nothing;
        }

        match actor.position.as_deref() {
            Some("lecturer") => {
                let courses = split_courses(actor.courses.as_deref());
                if courses.is_empty() {
                    Self::Nothing
                } else {
                    Self::Courses(courses)
                }
            }
            Some("hod") => match non_empty(actor.department.as_deref()) {
                Some(department) => Self::Department(department),
                None => Self::Nothing,
            },
            Some("dean") => match non_empty(actor.faculty.as_deref()) {
                Some(faculty) => Self::Faculty(faculty),
                None => Self::Nothing,
            },
            Some("admin" | "system-administrator") => Self::All,
            _ => Self::Nothing,
        }
    }

    /// Whether a single complaint is visible under this scope.
    #[must_use]
    pub fn permits(&self, complaint: &complaint::Model) -> bool {
        match self {
            Self::All => true,
            Self::Courses(courses) => complaint
                .course
                .as_deref()
                .is_some_and(|course| courses.iter().any(|c| c == course)),
            Self::Department(department) => {
                complaint.department.as_deref() == Some(department.as_str())
            }
            Self::Faculty(faculty) => complaint.faculty.as_deref() == Some(faculty.as_str()),
            Self::Owner(user_id) => complaint.user_id == *user_id,
            Self::Nothing => false,
        }
    }

    /// The filter condition enforcing this scope in queries.
    ///
    /// Applied to both the list query and the find-by-id query so the two
    /// paths can never diverge.
    #[must_use]
    pub fn to_condition(&self) -> Condition {
        match self {
            Self::All => Condition::all(),
            Self::Courses(courses) => {
                Condition::all().add(complaint::Column::Course.is_in(courses.clone()))
            }
            Self::Department(department) => {
                Condition::all().add(complaint::Column::Department.eq(department.clone()))
            }
            Self::Faculty(faculty) => {
                Condition::all().add(complaint::Column::Faculty.eq(faculty.clone()))
            }
            Self::Owner(user_id) => {
                Condition::all().add(complaint::Column::UserId.eq(user_id.clone()))
            }
            // WHERE FALSE: an empty condition would mean "everything".
            Self::Nothing => Condition::all().add(Expr::value(false)),
        }
    }
}

fn split_courses(courses: Option<&str>) -> Vec<String> {
    courses
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(ToString::to_string)
        .collect()
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(ToString::to_string)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use examdesk_db::entities::complaint::ComplaintStatus;
    use sea_orm::{DbBackend, EntityTrait, QueryFilter, QueryTrait};

    fn admin(position: &str) -> SessionActor {
        SessionActor {
            user_id: "a1".to_string(),
            role: "admin".to_string(),
            position: Some(position.to_string()),
            department: None,
            faculty: None,
            courses: None,
        }
    }

    fn test_complaint(course: &str, department: &str, faculty: &str) -> complaint::Model {
        complaint::Model {
            id: "c1".to_string(),
            reference_number: "REF-100001".to_string(),
            user_id: "student1".to_string(),
            full_name: "Grace Hopper".to_string(),
            student_id: "S1234".to_string(),
            email: "grace@example.edu".to_string(),
            phone: None,
            exam_name: "Compilers Final".to_string(),
            exam_date: Utc::now().date_naive(),
            complaint_type: "grading".to_string(),
            description: "The second question was marked wrong.".to_string(),
            desired_resolution: "Remark the paper".to_string(),
            evidence_url: None,
            status: ComplaintStatus::Pending,
            course: Some(course.to_string()),
            department: Some(department.to_string()),
            faculty: Some(faculty.to_string()),
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[test]
    fn test_lecturer_sees_only_own_courses() {
        let mut actor = admin("lecturer");
        actor.courses = Some("CS101,CS202".to_string());
        let scope = ComplaintScope::for_actor(&actor);

        assert!(scope.permits(&test_complaint("CS101", "CS", "Science")));
        assert!(scope.permits(&test_complaint("CS202", "CS", "Science")));
        assert!(!scope.permits(&test_complaint("CS303", "CS", "Science")));
    }

    #[test]
    fn test_lecturer_without_courses_sees_nothing() {
        let actor = admin("lecturer");
        assert_eq!(ComplaintScope::for_actor(&actor), ComplaintScope::Nothing);

        let mut blank = admin("lecturer");
        blank.courses = Some("  , ,".to_string());
        assert_eq!(ComplaintScope::for_actor(&blank), ComplaintScope::Nothing);
    }

    #[test]
    fn test_lecturer_course_whitespace_is_trimmed() {
        let mut actor = admin("lecturer");
        actor.courses = Some(" CS101 , CS202 ".to_string());
        let scope = ComplaintScope::for_actor(&actor);

        assert!(scope.permits(&test_complaint("CS101", "CS", "Science")));
    }

    #[test]
    fn test_hod_scoped_to_department() {
        let mut actor = admin("hod");
        actor.department = Some("Computer Science".to_string());
        let scope = ComplaintScope::for_actor(&actor);

        assert!(scope.permits(&test_complaint("CS101", "Computer Science", "Science")));
        assert!(!scope.permits(&test_complaint("CS101", "Mathematics", "Science")));
    }

    #[test]
    fn test_hod_without_department_sees_nothing() {
        // Never "sees everything" when the scope attribute is missing.
        let actor = admin("hod");
        assert_eq!(ComplaintScope::for_actor(&actor), ComplaintScope::Nothing);
    }

    #[test]
    fn test_dean_scoped_to_faculty() {
        let mut actor = admin("dean");
        actor.faculty = Some("Science".to_string());
        let scope = ComplaintScope::for_actor(&actor);

        assert!(scope.permits(&test_complaint("CS101", "CS", "Science")));
        assert!(!scope.permits(&test_complaint("CS101", "CS", "Arts")));
    }

    #[test]
    fn test_system_administrator_sees_everything() {
        let scope = ComplaintScope::for_actor(&admin("system-administrator"));
        assert_eq!(scope, ComplaintScope::All);
        assert!(scope.permits(&test_complaint("CS999", "Anything", "Anywhere")));
    }

    #[test]
    fn test_unknown_position_sees_nothing() {
        assert_eq!(
            ComplaintScope::for_actor(&admin("registrar")),
            ComplaintScope::Nothing
        );

        let mut no_position = admin("lecturer");
        no_position.position = None;
        assert_eq!(
            ComplaintScope::for_actor(&no_position),
            ComplaintScope::Nothing
        );
    }

    #[test]
    fn test_student_restricted_to_own_complaints() {
        let actor = SessionActor {
            user_id: "student1".to_string(),
            role: "student".to_string(),
            position: None,
            department: None,
            faculty: None,
            courses: None,
        };
        let scope = ComplaintScope::for_actor(&actor);

        assert_eq!(scope, ComplaintScope::Owner("student1".to_string()));
        assert!(scope.permits(&test_complaint("CS101", "CS", "Science")));

        let mut other = test_complaint("CS101", "CS", "Science");
        other.user_id = "student2".to_string();
        assert!(!scope.permits(&other));
    }

    #[test]
    fn test_scoped_admin_does_not_see_null_attribute_complaints() {
        let mut actor = admin("lecturer");
        actor.courses = Some("CS101".to_string());
        let scope = ComplaintScope::for_actor(&actor);

        let mut no_course = test_complaint("CS101", "CS", "Science");
        no_course.course = None;
        assert!(!scope.permits(&no_course));
    }

    #[test]
    fn test_nothing_condition_matches_no_rows() {
        let sql = complaint::Entity::find()
            .filter(ComplaintScope::Nothing.to_condition())
            .build(DbBackend::Postgres)
            .to_string();
        assert!(sql.contains("FALSE"), "expected WHERE FALSE in: {sql}");
    }

    #[test]
    fn test_list_and_get_share_one_condition() {
        let mut actor = admin("lecturer");
        actor.courses = Some("CS101".to_string());
        let scope = ComplaintScope::for_actor(&actor);

        // Both paths derive their filter from the same value.
        let list_sql = complaint::Entity::find()
            .filter(scope.to_condition())
            .build(DbBackend::Postgres)
            .to_string();
        let get_sql = complaint::Entity::find_by_id("c1")
            .filter(scope.to_condition())
            .build(DbBackend::Postgres)
            .to_string();

        assert!(list_sql.contains("course"));
        assert!(get_sql.contains("course"));
    }
}
