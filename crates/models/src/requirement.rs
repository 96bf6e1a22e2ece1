//! Requirement definitions and the progress evaluator.
//!
//! A [`Requirement`] is a rule a degree imposes on a plan: take specific
//! courses, accumulate units, choose from lists, or concentrate within
//! subjects. [`Requirement::evaluate`] is a pure function from the plan's
//! course entries to a [`Progress`]; persistence of the result is the
//! caller's concern.

use crate::{
    course::{CourseKey, PlannedCourse},
    filters::{LevelRestriction, SubjectFilter},
    status::RequirementStatus,
};
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// Evaluation result for one requirement: a status plus an integer
/// percentage. `percent` is floored and reaches 100 only when the
/// requirement's threshold is actually met.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Progress {
    pub status: RequirementStatus,
    pub percent: i16,
}

impl Progress {
    pub fn not_started() -> Self {
        Self {
            status: RequirementStatus::NotStarted,
            percent: 0,
        }
    }

    /// Progress of a count-based rule: `satisfied` filled slots out of
    /// `required`. A non-positive threshold cannot be evaluated.
    pub fn from_counts(satisfied: usize, required: usize) -> Self {
        if required == 0 {
            return Self::not_started();
        }

        if satisfied >= required {
            Self {
                status: RequirementStatus::Completed,
                percent: 100,
            }
        } else if satisfied > 0 {
            Self {
                status: RequirementStatus::InProgress,
                percent: (satisfied * 100 / required) as i16,
            }
        } else {
            Self::not_started()
        }
    }

    /// Progress of a unit-total rule: `earned` units out of `required`.
    pub fn from_units(earned: f64, required: f64) -> Self {
        if required <= 0.0 {
            return Self::not_started();
        }

        if earned >= required {
            Self {
                status: RequirementStatus::Completed,
                percent: 100,
            }
        } else if earned > 0.0 {
            // 100 is reserved for met thresholds
            let percent = ((earned * 100.0 / required).floor() as i16).min(99);
            Self {
                status: RequirementStatus::InProgress,
                percent,
            }
        } else {
            Self::not_started()
        }
    }
}

/// A declared equivalence: `substitute` may stand in for `original` when
/// the plan does not contain `original` itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Substitution {
    pub original: CourseKey,
    pub substitute: CourseKey,
}

/// A named sub-group of courses inside a multi-list requirement
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CourseGroup {
    pub name: Option<String>,
    pub courses: Vec<CourseKey>,
}

/// Breadth/depth constraint layered on top of a count-based rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ConcentrationRule {
    /// Satisfying courses must span at least this many distinct subjects
    SubjectSpread { min_subjects: usize },
    /// At least `min_courses` satisfying courses must share one subject;
    /// a named subject pins which one, `None` accepts any single subject
    SubjectDepth {
        subject: Option<String>,
        min_courses: usize,
    },
}

impl ConcentrationRule {
    fn is_satisfied(&self, matched: &[&PlannedCourse]) -> bool {
        match self {
            Self::SubjectSpread { min_subjects } => {
                let subjects: HashSet<&str> =
                    matched.iter().map(|c| c.key.subject.as_str()).collect();
                subjects.len() >= *min_subjects
            }
            Self::SubjectDepth {
                subject,
                min_courses,
            } => {
                let mut per_subject: HashMap<&str, usize> = HashMap::new();
                for course in matched {
                    *per_subject.entry(course.key.subject.as_str()).or_default() += 1;
                }

                match subject {
                    Some(code) => per_subject.get(code.as_str()).copied().unwrap_or(0)
                        >= *min_courses,
                    None => per_subject.values().any(|count| *count >= *min_courses),
                }
            }
        }
    }
}

/// The closed set of requirement kinds. Thresholds arrive here already
/// defaulted; a zero count or non-positive unit total marks a definition
/// that cannot be evaluated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum RequirementRule {
    /// Satisfy `courses_required` of an explicit course set
    CourseList {
        required: Vec<CourseKey>,
        courses_required: usize,
    },
    /// Accumulate `units_required` units from completed courses passing
    /// the subject and level filters
    Units {
        units_required: f32,
        subjects: Option<SubjectFilter>,
        level: Option<LevelRestriction>,
    },
    /// Satisfy `courses_required` drawn from the union of the lists
    MultiList {
        lists: Vec<CourseGroup>,
        courses_required: usize,
        concentration: Option<ConcentrationRule>,
    },
    /// Count like a course list, but completion additionally needs the
    /// concentration rule to hold
    Concentration {
        pool: Vec<CourseKey>,
        courses_required: usize,
        rule: ConcentrationRule,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Requirement {
    pub name: String,
    pub rule: RequirementRule,
    pub substitutions: Vec<Substitution>,
}

impl Requirement {
    pub fn new(name: &str, rule: RequirementRule) -> Self {
        Self {
            name: name.to_string(),
            rule,
            substitutions: Vec::new(),
        }
    }

    pub fn with_substitutions(mut self, substitutions: Vec<Substitution>) -> Self {
        self.substitutions = substitutions;
        self
    }

    /// Evaluates this requirement against a plan's course entries.
    ///
    /// Pure: reads the inputs, returns a [`Progress`], mutates nothing.
    /// Running it twice on the same inputs yields the same result.
    pub fn evaluate(&self, plan_courses: &[PlannedCourse]) -> Progress {
        match &self.rule {
            RequirementRule::CourseList {
                required,
                courses_required,
            } => self.evaluate_count(required, *courses_required, None, plan_courses),
            RequirementRule::Units {
                units_required,
                subjects,
                level,
            } => evaluate_units(*units_required, subjects.as_ref(), level.as_ref(), plan_courses),
            RequirementRule::MultiList {
                lists,
                courses_required,
                concentration,
            } => {
                let pool = union_of(lists);
                self.evaluate_count(
                    &pool,
                    *courses_required,
                    concentration.as_ref(),
                    plan_courses,
                )
            }
            RequirementRule::Concentration {
                pool,
                courses_required,
                rule,
            } => self.evaluate_count(pool, *courses_required, Some(rule), plan_courses),
        }
    }

    fn evaluate_count(
        &self,
        pool: &[CourseKey],
        required: usize,
        concentration: Option<&ConcentrationRule>,
        plan_courses: &[PlannedCourse],
    ) -> Progress {
        if required == 0 {
            return Progress::not_started();
        }

        let matched = self.match_courses(pool, plan_courses);
        let mut progress = Progress::from_counts(matched.len(), required);

        // The count threshold alone does not complete a concentration;
        // the breadth/depth rule must hold over the satisfying courses.
        if progress.status == RequirementStatus::Completed
            && let Some(rule) = concentration
            && !rule.is_satisfied(&matched)
        {
            progress.status = RequirementStatus::InProgress;
        }

        progress
    }

    /// Matches plan courses to the required slots in `pool`. Each slot is
    /// filled at most once and each plan course fills at most one slot.
    /// Direct matches claim their courses before any substitution can.
    fn match_courses<'a>(
        &self,
        pool: &[CourseKey],
        plan_courses: &'a [PlannedCourse],
    ) -> Vec<&'a PlannedCourse> {
        let slots = dedup_keys(pool);
        let countable: Vec<&PlannedCourse> = plan_courses
            .iter()
            .filter(|course| course.counts_toward_requirements())
            .collect();

        let mut used = vec![false; countable.len()];
        let mut unfilled = Vec::new();
        let mut matched = Vec::new();

        for slot in &slots {
            let direct =
                (0..countable.len()).find(|&idx| !used[idx] && countable[idx].key == **slot);

            match direct {
                Some(idx) => {
                    used[idx] = true;
                    matched.push(countable[idx]);
                }
                None => unfilled.push(*slot),
            }
        }

        for slot in unfilled {
            let substitutes: Vec<&CourseKey> = self
                .substitutions
                .iter()
                .filter(|sub| sub.original == *slot)
                .map(|sub| &sub.substitute)
                .collect();

            let found = (0..countable.len()).find(|&idx| {
                !used[idx] && substitutes.iter().any(|key| **key == countable[idx].key)
            });

            if let Some(idx) = found {
                used[idx] = true;
                matched.push(countable[idx]);
            }
        }

        matched
    }
}

fn evaluate_units(
    units_required: f32,
    subjects: Option<&SubjectFilter>,
    level: Option<&LevelRestriction>,
    plan_courses: &[PlannedCourse],
) -> Progress {
    let earned: f64 = plan_courses
        .iter()
        .filter(|course| course.banks_units())
        .filter(|course| subjects.is_none_or(|filter| filter.admits(&course.key)))
        .filter(|course| level.is_none_or(|restriction| restriction.admits(&course.key)))
        .map(|course| course.units as f64)
        .sum();

    Progress::from_units(earned, units_required as f64)
}

/// De-duplicated union of the groups' courses, preserving first appearance
pub fn union_of(lists: &[CourseGroup]) -> Vec<CourseKey> {
    let mut seen = HashSet::new();
    let mut pool = Vec::new();

    for list in lists {
        for key in &list.courses {
            if seen.insert(key.clone()) {
                pool.push(key.clone());
            }
        }
    }

    pool
}

fn dedup_keys(pool: &[CourseKey]) -> Vec<&CourseKey> {
    let mut seen = HashSet::new();
    pool.iter().filter(|key| seen.insert(*key)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::CourseStatus;

    fn key(s: &str) -> CourseKey {
        s.parse().unwrap()
    }

    fn completed(s: &str) -> PlannedCourse {
        PlannedCourse::new(key(s), 0.5, CourseStatus::Completed)
    }

    fn in_progress(s: &str) -> PlannedCourse {
        PlannedCourse::new(key(s), 0.5, CourseStatus::InProgress)
    }

    fn planned(s: &str) -> PlannedCourse {
        PlannedCourse::new(key(s), 0.5, CourseStatus::Planned)
    }

    fn course_list(courses: &[&str], courses_required: usize) -> Requirement {
        Requirement::new(
            "Core courses",
            RequirementRule::CourseList {
                required: courses.iter().map(|s| key(s)).collect(),
                courses_required,
            },
        )
    }

    fn assert_progress(progress: Progress, status: RequirementStatus, percent: i16) {
        assert_eq!(progress.status, status);
        assert_eq!(progress.percent, percent);
    }

    #[test]
    fn test_course_list_thresholds() {
        let requirement = course_list(&["MATH 135", "MATH 136", "MATH 137"], 2);

        assert_progress(
            requirement.evaluate(&[]),
            RequirementStatus::NotStarted,
            0,
        );
        assert_progress(
            requirement.evaluate(&[completed("MATH 135")]),
            RequirementStatus::InProgress,
            50,
        );
        assert_progress(
            requirement.evaluate(&[completed("MATH 135"), completed("MATH 136")]),
            RequirementStatus::Completed,
            100,
        );
    }

    #[test]
    fn test_honours_pure_mathematics_core() {
        // Plan for 2024-2025 carrying MATH 135 COMPLETED against the
        // "Core Math Courses" requirement (2 of {MATH 135, MATH 136})
        let requirement = course_list(&["MATH 135", "MATH 136"], 2);
        let progress = requirement.evaluate(&[completed("MATH 135")]);

        assert_progress(progress, RequirementStatus::InProgress, 50);
    }

    #[test]
    fn test_planned_courses_never_contribute() {
        let requirement = course_list(&["MATH 135", "MATH 136"], 2);
        let progress =
            requirement.evaluate(&[planned("MATH 135"), planned("MATH 136")]);

        assert_progress(progress, RequirementStatus::NotStarted, 0);
    }

    #[test]
    fn test_in_progress_counts_toward_course_lists() {
        let requirement = course_list(&["MATH 135", "MATH 136"], 2);
        let progress =
            requirement.evaluate(&[completed("MATH 135"), in_progress("MATH 136")]);

        assert_progress(progress, RequirementStatus::Completed, 100);
    }

    #[test]
    fn test_floor_rounding() {
        let requirement = course_list(&["CS 135", "CS 136", "CS 145"], 3);
        let progress = requirement.evaluate(&[completed("CS 135")]);

        assert_progress(progress, RequirementStatus::InProgress, 33);
    }

    #[test]
    fn test_excess_matches_cap_at_100() {
        let requirement = course_list(&["MATH 135", "MATH 136", "MATH 137"], 2);
        let progress = requirement.evaluate(&[
            completed("MATH 135"),
            completed("MATH 136"),
            completed("MATH 137"),
        ]);

        assert_progress(progress, RequirementStatus::Completed, 100);
    }

    #[test]
    fn test_monotonic_under_added_completions() {
        let requirement = course_list(&["MATH 135", "MATH 136"], 2);

        let before = requirement.evaluate(&[completed("MATH 135")]);
        let after =
            requirement.evaluate(&[completed("MATH 135"), completed("MATH 136")]);

        assert!(after.percent >= before.percent);
        assert_progress(after, RequirementStatus::Completed, 100);
    }

    #[test]
    fn test_evaluation_is_idempotent() {
        let requirement = course_list(&["MATH 135", "MATH 136"], 2);
        let plan = [completed("MATH 135")];

        assert_eq!(requirement.evaluate(&plan), requirement.evaluate(&plan));
    }

    #[test]
    fn test_degenerate_threshold() {
        let requirement = course_list(&["MATH 135"], 0);
        let progress = requirement.evaluate(&[completed("MATH 135")]);

        assert_progress(progress, RequirementStatus::NotStarted, 0);
    }

    #[test]
    fn test_substitute_satisfies_absent_original() {
        let requirement = course_list(&["MATH 135"], 1).with_substitutions(vec![
            Substitution {
                original: key("MATH 135"),
                substitute: key("MATH 145"),
            },
        ]);

        let progress = requirement.evaluate(&[completed("MATH 145")]);
        assert_progress(progress, RequirementStatus::Completed, 100);
    }

    #[test]
    fn test_direct_match_wins_over_substitution() {
        // MATH 145 may stand in for MATH 135, but the plan holds the
        // original, so the substitute fills nothing extra here
        let requirement = course_list(&["MATH 135", "MATH 136"], 2).with_substitutions(
            vec![Substitution {
                original: key("MATH 136"),
                substitute: key("MATH 135"),
            }],
        );

        let progress = requirement.evaluate(&[completed("MATH 135")]);
        assert_progress(progress, RequirementStatus::InProgress, 50);
    }

    #[test]
    fn test_each_plan_course_fills_one_slot() {
        let requirement = course_list(&["MATH 135", "MATH 136"], 2).with_substitutions(
            vec![Substitution {
                original: key("MATH 135"),
                substitute: key("MATH 136"),
            }],
        );

        // The single MATH 136 fills its own slot and cannot double as a
        // substitute for MATH 135
        let progress = requirement.evaluate(&[completed("MATH 136")]);
        assert_progress(progress, RequirementStatus::InProgress, 50);
    }

    #[test]
    fn test_units_arithmetic() {
        let requirement = Requirement::new(
            "Mathematics units",
            RequirementRule::Units {
                units_required: 2.0,
                subjects: SubjectFilter::parse("MATH"),
                level: None,
            },
        );

        let three = [
            completed("MATH 135"),
            completed("MATH 136"),
            completed("MATH 137"),
        ];
        assert_progress(
            requirement.evaluate(&three),
            RequirementStatus::InProgress,
            75,
        );

        let four = [
            completed("MATH 135"),
            completed("MATH 136"),
            completed("MATH 137"),
            completed("MATH 138"),
        ];
        assert_progress(
            requirement.evaluate(&four),
            RequirementStatus::Completed,
            100,
        );
    }

    #[test]
    fn test_units_only_bank_on_completion() {
        let requirement = Requirement::new(
            "Mathematics units",
            RequirementRule::Units {
                units_required: 1.0,
                subjects: None,
                level: None,
            },
        );

        let progress =
            requirement.evaluate(&[in_progress("MATH 135"), planned("MATH 136")]);
        assert_progress(progress, RequirementStatus::NotStarted, 0);
    }

    #[test]
    fn test_units_respect_filters() {
        let requirement = Requirement::new(
            "Advanced mathematics units",
            RequirementRule::Units {
                units_required: 1.0,
                subjects: SubjectFilter::parse("MATH,PMATH"),
                level: Some(LevelRestriction::new(300)),
            },
        );

        let progress = requirement.evaluate(&[
            completed("PMATH 347"), // counts
            completed("MATH 239"),  // below level
            completed("CS 341"),    // wrong subject
        ]);
        assert_progress(progress, RequirementStatus::InProgress, 50);
    }

    #[test]
    fn test_units_degenerate_threshold() {
        let requirement = Requirement::new(
            "Empty units",
            RequirementRule::Units {
                units_required: 0.0,
                subjects: None,
                level: None,
            },
        );

        let progress = requirement.evaluate(&[completed("MATH 135")]);
        assert_progress(progress, RequirementStatus::NotStarted, 0);
    }

    #[test]
    fn test_multi_list_union() {
        let requirement = Requirement::new(
            "Electives",
            RequirementRule::MultiList {
                lists: vec![
                    CourseGroup {
                        name: Some("List 1".to_string()),
                        courses: vec![key("AMATH 331"), key("PMATH 331")],
                    },
                    CourseGroup {
                        name: Some("List 2".to_string()),
                        courses: vec![key("PMATH 331"), key("PMATH 332")],
                    },
                ],
                courses_required: 2,
                concentration: None,
            },
        );

        // PMATH 331 appears in both lists but is one slot; any mix across
        // lists satisfies the count
        let progress =
            requirement.evaluate(&[completed("PMATH 331"), in_progress("PMATH 332")]);
        assert_progress(progress, RequirementStatus::Completed, 100);
    }

    #[test]
    fn test_subject_spread_blocks_completion() {
        let requirement = Requirement::new(
            "Breadth",
            RequirementRule::Concentration {
                pool: vec![key("MATH 135"), key("MATH 136"), key("PMATH 347")],
                courses_required: 2,
                rule: ConcentrationRule::SubjectSpread { min_subjects: 2 },
            },
        );

        // Count met, but both courses share a subject: blocked at
        // IN_PROGRESS with the computed percent left alone
        let same_subject =
            requirement.evaluate(&[completed("MATH 135"), completed("MATH 136")]);
        assert_progress(same_subject, RequirementStatus::InProgress, 100);

        let spread = requirement.evaluate(&[completed("MATH 135"), completed("PMATH 347")]);
        assert_progress(spread, RequirementStatus::Completed, 100);
    }

    #[test]
    fn test_subject_spread_sees_all_matches() {
        let requirement = Requirement::new(
            "Breadth",
            RequirementRule::Concentration {
                pool: vec![key("MATH 135"), key("MATH 136"), key("PMATH 347")],
                courses_required: 2,
                rule: ConcentrationRule::SubjectSpread { min_subjects: 2 },
            },
        );

        // Three matches span two subjects even though only two are needed
        let progress = requirement.evaluate(&[
            completed("MATH 135"),
            completed("MATH 136"),
            completed("PMATH 347"),
        ]);
        assert_progress(progress, RequirementStatus::Completed, 100);
    }

    #[test]
    fn test_subject_depth_named() {
        let requirement = Requirement::new(
            "Pure math depth",
            RequirementRule::Concentration {
                pool: vec![key("PMATH 347"), key("PMATH 348"), key("MATH 235")],
                courses_required: 2,
                rule: ConcentrationRule::SubjectDepth {
                    subject: Some("PMATH".to_string()),
                    min_courses: 2,
                },
            },
        );

        let shallow =
            requirement.evaluate(&[completed("PMATH 347"), completed("MATH 235")]);
        assert_progress(shallow, RequirementStatus::InProgress, 100);

        let deep = requirement.evaluate(&[completed("PMATH 347"), completed("PMATH 348")]);
        assert_progress(deep, RequirementStatus::Completed, 100);
    }

    #[test]
    fn test_subject_depth_any_subject() {
        let requirement = Requirement::new(
            "Depth",
            RequirementRule::Concentration {
                pool: vec![key("PMATH 347"), key("PMATH 348"), key("CO 342")],
                courses_required: 2,
                rule: ConcentrationRule::SubjectDepth {
                    subject: None,
                    min_courses: 2,
                },
            },
        );

        let progress =
            requirement.evaluate(&[completed("PMATH 347"), completed("PMATH 348")]);
        assert_progress(progress, RequirementStatus::Completed, 100);
    }

    #[test]
    fn test_multi_list_with_concentration_gate() {
        let requirement = Requirement::new(
            "Concentration electives",
            RequirementRule::MultiList {
                lists: vec![CourseGroup {
                    name: None,
                    courses: vec![key("STAT 230"), key("STAT 231"), key("ACTSC 231")],
                }],
                courses_required: 2,
                concentration: Some(ConcentrationRule::SubjectSpread { min_subjects: 2 }),
            },
        );

        let blocked =
            requirement.evaluate(&[completed("STAT 230"), completed("STAT 231")]);
        assert_progress(blocked, RequirementStatus::InProgress, 100);
    }
}
