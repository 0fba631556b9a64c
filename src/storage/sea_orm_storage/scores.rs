//! 关联与评分存储操作

use super::db_errors::{WriteOp, map_read_error, map_write_error};
use super::{RECENT_LIMIT, SeaOrmStorage};
use crate::entity::prelude::Scores;
use crate::entity::scores::{ActiveModel, Column};
use crate::errors::Result;
use crate::models::{Grade, ScoreAggregate, ScoreFilter, SubScores};
use crate::utils::contains_pattern;
use crate::utils::score::average;
use crate::utils::validate::{require_non_empty, require_same_length};
use sea_orm::{ColumnTrait, EntityTrait, FromQueryResult, QueryFilter, Set, Statement, Value};

/// 按 (课程, 教师) 分组的汇总，没有评分的分组各项为 0
const AGGREGATE_SELECT: &str = r#"
SELECT
    s.course_code AS course_code,
    c.name AS course_name,
    s.professor_id AS professor_id,
    p.name AS professor_name,
    COALESCE(AVG(s.score_teaching), 0.0) AS teaching,
    COALESCE(AVG(s.score_coursework), 0.0) AS coursework,
    COALESCE(AVG(s.score_learning), 0.0) AS learning
FROM scores s
INNER JOIN courses c ON c.code = s.course_code
INNER JOIN professors p ON p.id = s.professor_id
"#;

const AGGREGATE_GROUP: &str = "GROUP BY s.course_code, c.name, s.professor_id, p.name \
     ORDER BY MAX(s.inserted_at) DESC, MAX(s.id) DESC";

#[derive(Debug, FromQueryResult)]
struct AggregateRow {
    course_code: String,
    course_name: String,
    professor_id: String,
    professor_name: String,
    teaching: f64,
    coursework: f64,
    learning: f64,
}

impl AggregateRow {
    fn into_aggregate(self) -> ScoreAggregate {
        ScoreAggregate {
            average: average(&[self.teaching, self.coursework, self.learning]),
            course_code: self.course_code,
            course_name: self.course_name,
            professor_id: self.professor_id,
            professor_name: self.professor_name,
            teaching: self.teaching,
            coursework: self.coursework,
            learning: self.learning,
        }
    }
}

/// 查询条件对应的 WHERE 子句与参数
fn filter_clause(filter: &ScoreFilter) -> Option<(&'static str, Value)> {
    let clause = match filter {
        ScoreFilter::Latest => return None,
        ScoreFilter::ProfessorId(_) => "WHERE s.professor_id = $1",
        ScoreFilter::ProfessorName(_) => "WHERE p.name = $1",
        ScoreFilter::ProfessorNameLike(_) => r"WHERE p.name LIKE $1 ESCAPE '\'",
        ScoreFilter::CourseCode(_) => "WHERE s.course_code = $1",
        ScoreFilter::CourseCodeLike(_) => r"WHERE s.course_code LIKE $1 ESCAPE '\'",
        ScoreFilter::CourseName(_) => "WHERE c.name = $1",
        ScoreFilter::CourseNameLike(_) => r"WHERE c.name LIKE $1 ESCAPE '\'",
    };

    let argument = if filter.is_substring_match() {
        contains_pattern(filter.argument().trim())
    } else {
        filter.argument().to_string()
    };

    Some((clause, argument.into()))
}

fn aggregate_statement(filter: &ScoreFilter) -> (String, Vec<Value>) {
    let mut sql = String::from(AGGREGATE_SELECT);
    let mut values = Vec::new();

    if let Some((clause, value)) = filter_clause(filter) {
        sql.push_str(clause);
        sql.push('\n');
        values.push(value);
    }

    sql.push_str(AGGREGATE_GROUP);
    if filter.is_capped() {
        sql.push_str(&format!(" LIMIT {RECENT_LIMIT}"));
    }

    (sql, values)
}

impl SeaOrmStorage {
    /// 建立教师与课程的关联：空指纹、无分项的评分行
    pub async fn add_course_professor_impl(
        &self,
        professor_id: &str,
        course_code: &str,
    ) -> Result<()> {
        require_non_empty("professor_id", professor_id)?;
        require_non_empty("course_code", course_code)?;

        let model = ActiveModel {
            fingerprint: Set(String::new()),
            professor_id: Set(professor_id.to_string()),
            course_code: Set(course_code.to_string()),
            score_teaching: Set(None),
            score_coursework: Set(None),
            score_learning: Set(None),
            inserted_at: Set(chrono::Utc::now()),
            ..Default::default()
        };

        Scores::insert(model)
            .exec_without_returning(&self.db)
            .await
            .map_err(|e| map_write_error(e, WriteOp::Insert, "关联教师与课程失败"))?;

        Ok(())
    }

    /// 批量关联，两个列表按下标配对
    pub async fn add_course_professors_impl(
        &self,
        professor_ids: Vec<String>,
        course_codes: Vec<String>,
    ) -> Result<()> {
        require_same_length(professor_ids.len(), course_codes.len())?;

        for (professor_id, course_code) in professor_ids.iter().zip(&course_codes) {
            self.add_course_professor_impl(professor_id, course_code)
                .await?;
        }
        Ok(())
    }

    /// 指纹是否已有评分
    pub async fn is_graded_impl(&self, fingerprint: &str) -> Result<bool> {
        let existing = Scores::find()
            .filter(Column::Fingerprint.eq(fingerprint))
            .one(&self.db)
            .await
            .map_err(|e| map_read_error(e, "查询评分失败"))?;

        Ok(existing.is_some())
    }

    /// 写入一条评分
    pub async fn insert_grade_impl(
        &self,
        fingerprint: &str,
        professor_id: &str,
        course_code: &str,
        scores: SubScores,
    ) -> Result<Grade> {
        require_non_empty("fingerprint", fingerprint)?;
        scores.validate()?;
        let now = chrono::Utc::now();

        let model = ActiveModel {
            fingerprint: Set(fingerprint.to_string()),
            professor_id: Set(professor_id.to_string()),
            course_code: Set(course_code.to_string()),
            score_teaching: Set(Some(scores.teaching)),
            score_coursework: Set(Some(scores.coursework)),
            score_learning: Set(Some(scores.learning)),
            inserted_at: Set(now),
            ..Default::default()
        };

        Scores::insert(model)
            .exec_without_returning(&self.db)
            .await
            .map_err(|e| map_write_error(e, WriteOp::Insert, "写入评分失败"))?;

        Ok(Grade {
            fingerprint: fingerprint.to_string(),
            professor_id: professor_id.to_string(),
            course_code: course_code.to_string(),
            scores,
            average: scores.average(),
            inserted_at: now,
        })
    }

    /// 评分汇总
    pub async fn list_scores_impl(&self, filter: ScoreFilter) -> Result<Vec<ScoreAggregate>> {
        let (sql, values) = aggregate_statement(&filter);
        let stmt = Statement::from_sql_and_values(self.db.get_database_backend(), sql, values);

        let rows = AggregateRow::find_by_statement(stmt)
            .all(&self.db)
            .await
            .map_err(|e| map_read_error(e, &format!("{} 查询失败", filter.operation())))?;

        Ok(rows.into_iter().map(AggregateRow::into_aggregate).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CreateCourseRequest;

    async fn seeded() -> (SeaOrmStorage, String) {
        let storage = SeaOrmStorage::in_memory().await;
        storage
            .add_courses_impl(vec![
                CreateCourseRequest::new("S209", "How to replace head gaskets"),
                CreateCourseRequest::new("CN9A", "Controlling the Anti Lag System"),
            ])
            .await
            .unwrap();
        let professor = storage
            .add_professor_impl("Great Teacher Onizuka")
            .await
            .unwrap();
        (storage, professor.id)
    }

    #[test]
    fn test_statement_shape() {
        let (sql, values) = aggregate_statement(&ScoreFilter::Latest);
        assert!(values.is_empty());
        assert!(sql.ends_with("LIMIT 100"));

        let (sql, values) = aggregate_statement(&ScoreFilter::CourseCode("S209".into()));
        assert_eq!(values.len(), 1);
        assert!(sql.contains("s.course_code = $1"));
        assert!(!sql.contains("LIMIT"));

        let (sql, values) = aggregate_statement(&ScoreFilter::CourseNameLike("50%".into()));
        assert!(sql.contains("LIKE $1"));
        assert!(sql.ends_with("LIMIT 100"));
        assert_eq!(values[0], Value::from(r"%50\%%".to_string()));
    }

    #[tokio::test]
    async fn test_association_duplicate_conflicts() {
        let (storage, professor_id) = seeded().await;
        storage
            .add_course_professor_impl(&professor_id, "S209")
            .await
            .unwrap();

        let err = storage
            .add_course_professor_impl(&professor_id, "S209")
            .await
            .expect_err("same unrated pair");
        assert_eq!(err.code(), "E002");
    }

    #[tokio::test]
    async fn test_association_unknown_reference() {
        let (storage, professor_id) = seeded().await;

        let err = storage
            .add_course_professor_impl(&professor_id, "NOPE")
            .await
            .expect_err("unknown course");
        assert_eq!(err.code(), "E004");

        let err = storage
            .add_course_professor_impl("not-a-professor", "S209")
            .await
            .expect_err("unknown professor");
        assert_eq!(err.code(), "E004");
    }

    #[tokio::test]
    async fn test_bulk_association_length_mismatch() {
        let (storage, professor_id) = seeded().await;
        let err = storage
            .add_course_professors_impl(vec![professor_id], vec!["S209".into(), "CN9A".into()])
            .await
            .expect_err("mismatched lengths");
        assert_eq!(err.code(), "E001");
        assert!(storage.list_scores_impl(ScoreFilter::Latest).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unrated_group_reports_zero() {
        let (storage, professor_id) = seeded().await;
        storage
            .add_course_professors_impl(
                vec![professor_id.clone(), professor_id.clone()],
                vec!["S209".into(), "CN9A".into()],
            )
            .await
            .unwrap();

        let rows = storage.list_scores_impl(ScoreFilter::Latest).await.unwrap();
        assert_eq!(rows.len(), 2);
        // 最近的关联在前
        assert_eq!(rows[0].course_code, "CN9A");
        for row in rows {
            assert_eq!(row.professor_name, "Great Teacher Onizuka");
            assert_eq!(row.scores(), SubScores::new(0.0, 0.0, 0.0));
            assert_eq!(row.average, 0.0);
        }
    }

    #[tokio::test]
    async fn test_grade_and_aggregate() {
        let (storage, professor_id) = seeded().await;
        storage
            .add_course_professor_impl(&professor_id, "S209")
            .await
            .unwrap();

        let grade = storage
            .insert_grade_impl("fp-jim", &professor_id, "S209", SubScores::new(5.0, 4.0, 3.0))
            .await
            .unwrap();
        assert_eq!(grade.average, 4.0);
        storage
            .insert_grade_impl("fp-amy", &professor_id, "S209", SubScores::new(4.0, 4.0, 4.0))
            .await
            .unwrap();

        assert!(storage.is_graded_impl("fp-jim").await.unwrap());
        assert!(!storage.is_graded_impl("fp-bob").await.unwrap());

        // 关联行不参与平均
        let rows = storage
            .list_scores_impl(ScoreFilter::CourseCode("S209".into()))
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].course_name, "How to replace head gaskets");
        assert_eq!(rows[0].scores(), SubScores::new(4.5, 4.0, 3.5));
        assert_eq!(rows[0].average, 4.0);

        for filter in [
            ScoreFilter::ProfessorId(professor_id.clone()),
            ScoreFilter::ProfessorName("Great Teacher Onizuka".into()),
            ScoreFilter::ProfessorNameLike("Onizuka".into()),
            ScoreFilter::CourseCodeLike("20".into()),
            ScoreFilter::CourseName("How to replace head gaskets".into()),
            ScoreFilter::CourseNameLike("gasket".into()),
        ] {
            let rows = storage.list_scores_impl(filter.clone()).await.unwrap();
            assert_eq!(rows.len(), 1, "{}", filter.operation());
            assert_eq!(rows[0].course_code, "S209");
        }

        assert!(
            storage
                .list_scores_impl(ScoreFilter::CourseName("how to".into()))
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn test_out_of_range_grade_rejected() {
        let (storage, professor_id) = seeded().await;
        let err = storage
            .insert_grade_impl("fp-jim", &professor_id, "S209", SubScores::new(6.0, 4.0, 3.0))
            .await
            .expect_err("teaching above range");
        assert_eq!(err.code(), "E001");
        assert!(!storage.is_graded_impl("fp-jim").await.unwrap());
    }

    #[tokio::test]
    async fn test_cascade_removes_referencing_scores() {
        let (storage, professor_id) = seeded().await;
        storage
            .insert_grade_impl("fp-jim", &professor_id, "S209", SubScores::new(5.0, 4.0, 3.0))
            .await
            .unwrap();

        let err = storage
            .remove_course_impl("S209", false)
            .await
            .expect_err("course still referenced");
        assert_eq!(err.code(), "E005");
        assert!(storage.is_graded_impl("fp-jim").await.unwrap());

        storage.remove_course_impl("S209", true).await.unwrap();
        assert!(!storage.is_graded_impl("fp-jim").await.unwrap());
        assert!(
            storage
                .list_scores_impl(ScoreFilter::CourseCode("S209".into()))
                .await
                .unwrap()
                .is_empty()
        );
    }
}
