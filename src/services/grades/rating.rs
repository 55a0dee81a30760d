//! 评分计算
//!
//! `rating = Σ[priority(q) + heat(q) × factor_heat / 100] + votes_cast × factor_vote / 100`
//!
//! 只统计已审核且非匿名的问题；`priority(q)` 在教师调整过时取 `tpriority`，
//! 否则取 `factor_priority / 100`。`votes_cast` 为用户投给他人已审核问题的票数。
//! 内部以百分之一为单位做整数累加，结果与输入顺序无关。

use std::collections::HashMap;

use crate::models::{
    grades::entities::RatingFactors, questions::entities::Question, votes::entities::Vote,
};

/// 单个用户的参与统计
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserTally {
    pub posts: i64,
    pub heat_given: i64,
    pub heat_received: i64,
    pub raw_rating: f64,
}

#[derive(Debug, Default)]
struct Accumulator {
    posts: i64,
    heat_given: i64,
    heat_received: i64,
    hundredths: i64,
}

impl Accumulator {
    fn finish(self) -> UserTally {
        UserTally {
            posts: self.posts,
            heat_given: self.heat_given,
            heat_received: self.heat_received,
            raw_rating: self.hundredths as f64 / 100.0,
        }
    }
}

/// 问题是否计入作者评分
pub fn is_rated(question: &Question) -> bool {
    question.approved && !question.anonymous
}

/// 问题优先级，单位为百分之一
fn priority_hundredths(question: &Question, factors: &RatingFactors) -> i64 {
    if question.tpriority != 0 {
        i64::from(question.tpriority) * 100
    } else {
        i64::from(factors.priority)
    }
}

/// 每个问题的热度，只统计他人投出的票
pub fn heat_counts(questions: &[Question], votes: &[Vote]) -> HashMap<i64, i64> {
    let authors: HashMap<i64, i64> = questions.iter().map(|q| (q.id, q.user_id)).collect();
    let mut heat: HashMap<i64, i64> = HashMap::new();
    for vote in votes {
        if authors
            .get(&vote.question_id)
            .is_some_and(|author| *author != vote.voter_id)
        {
            *heat.entry(vote.question_id).or_default() += 1;
        }
    }
    heat
}

/// 计算活动内所有用户的统计与评分
pub fn tally_users(
    questions: &[Question],
    votes: &[Vote],
    factors: &RatingFactors,
) -> HashMap<i64, UserTally> {
    let by_id: HashMap<i64, &Question> = questions.iter().map(|q| (q.id, q)).collect();

    let heat = heat_counts(questions, votes);

    let mut acc: HashMap<i64, Accumulator> = HashMap::new();

    for question in questions.iter().filter(|q| is_rated(q)) {
        let received = heat.get(&question.id).copied().unwrap_or(0);
        let entry = acc.entry(question.user_id).or_default();
        entry.posts += 1;
        entry.heat_received += received;
        entry.hundredths +=
            priority_hundredths(question, factors) + received * i64::from(factors.heat);
    }

    for vote in votes {
        let Some(question) = by_id.get(&vote.question_id) else {
            continue;
        };
        if !question.approved || question.user_id == vote.voter_id {
            continue;
        }
        let entry = acc.entry(vote.voter_id).or_default();
        entry.heat_given += 1;
        entry.hundredths += i64::from(factors.vote);
    }

    acc.into_iter()
        .map(|(user_id, a)| (user_id, a.finish()))
        .collect()
}

/// 单个用户的原始评分
pub fn rating_for(
    user_id: i64,
    questions: &[Question],
    votes: &[Vote],
    factors: &RatingFactors,
) -> f64 {
    tally_users(questions, votes, factors)
        .remove(&user_id)
        .map(|t| t.raw_rating)
        .unwrap_or(0.0)
}

/// 成绩册成绩，未设置满分时返回 None
pub fn clamp_grade(raw_rating: f64, grade_max: f64) -> Option<f64> {
    if grade_max <= 0.0 {
        return None;
    }
    Some(raw_rating.clamp(0.0, grade_max))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn question(id: i64, user_id: i64, approved: bool, anonymous: bool, tpriority: i32) -> Question {
        Question {
            id,
            hotquestion_id: 1,
            user_id,
            content: format!("question {id}"),
            time: Utc.timestamp_opt(1_000 + id, 0).single().expect("valid timestamp"),
            anonymous,
            approved,
            tpriority,
        }
    }

    fn vote(id: i64, question_id: i64, voter_id: i64) -> Vote {
        Vote {
            id,
            question_id,
            voter_id,
        }
    }

    #[test]
    fn test_default_factors() {
        // 用户 1 提问两条，用户 2 投了 1 票，用户 3 投了 2 票
        let questions = vec![question(1, 1, true, false, 0), question(2, 1, true, false, 0)];
        let votes = vec![vote(1, 1, 2), vote(2, 1, 3), vote(3, 2, 3)];
        let tallies = tally_users(&questions, &votes, &RatingFactors::default());

        let author = &tallies[&1];
        assert_eq!(author.posts, 2);
        assert_eq!(author.heat_received, 3);
        // 2 × 1.0 优先级 + 3 × 1.0 热度
        assert_eq!(author.raw_rating, 5.0);

        assert_eq!(tallies[&2].raw_rating, 1.0);
        assert_eq!(tallies[&3].heat_given, 2);
        assert_eq!(tallies[&3].raw_rating, 2.0);
    }

    #[test]
    fn test_teacher_priority_overrides_factor() {
        let factors = RatingFactors {
            priority: 50,
            heat: 100,
            vote: 100,
        };
        let questions = vec![question(1, 1, true, false, 3), question(2, 1, true, false, 0)];
        // 3 + 0.5
        assert_eq!(rating_for(1, &questions, &[], &factors), 3.5);

        let negative = vec![question(3, 2, true, false, -2)];
        assert_eq!(rating_for(2, &negative, &[], &factors), -2.0);
    }

    #[test]
    fn test_unapproved_and_anonymous_not_rated() {
        let questions = vec![
            question(1, 1, false, false, 0),
            question(2, 1, true, true, 0),
            question(3, 2, true, true, 0),
        ];
        let votes = vec![vote(1, 1, 2), vote(2, 2, 2), vote(3, 3, 1)];
        let tallies = tally_users(&questions, &votes, &RatingFactors::default());

        // 用户 1 的问题均不计分，但对用户 2 的匿名问题投票计分
        assert_eq!(tallies[&1].posts, 0);
        assert_eq!(tallies[&1].raw_rating, 1.0);
        // 对未审核问题的投票不计
        assert_eq!(tallies[&2].heat_given, 1);
        assert_eq!(tallies[&2].raw_rating, 1.0);
    }

    #[test]
    fn test_self_vote_not_counted() {
        let questions = vec![question(1, 1, true, false, 0)];
        let votes = vec![vote(1, 1, 1)];
        let tallies = tally_users(&questions, &votes, &RatingFactors::default());
        assert_eq!(tallies[&1].heat_given, 0);
        assert_eq!(tallies[&1].heat_received, 0);
        assert_eq!(tallies[&1].raw_rating, 1.0);
    }

    #[test]
    fn test_heat_counts_skip_author_votes() {
        let questions = vec![question(1, 1, true, false, 0), question(2, 2, false, true, 0)];
        let votes = vec![vote(1, 1, 1), vote(2, 1, 2), vote(3, 2, 1), vote(4, 9, 3)];
        let heat = heat_counts(&questions, &votes);
        assert_eq!(heat.get(&1), Some(&1));
        assert_eq!(heat.get(&2), Some(&1));
        assert!(!heat.contains_key(&9));
    }

    #[test]
    fn test_factor_weights() {
        let factors = RatingFactors {
            priority: 0,
            heat: 25,
            vote: 10,
        };
        let questions = vec![question(1, 1, true, false, 0)];
        let votes = vec![vote(1, 1, 2), vote(2, 1, 3)];
        let tallies = tally_users(&questions, &votes, &factors);
        assert_eq!(tallies[&1].raw_rating, 0.5);
        assert_eq!(tallies[&2].raw_rating, 0.1);
    }

    #[test]
    fn test_deterministic_for_snapshot() {
        let questions = vec![
            question(1, 1, true, false, 1),
            question(2, 2, true, false, 0),
            question(3, 3, true, false, 0),
        ];
        let votes = vec![vote(1, 1, 2), vote(2, 2, 3), vote(3, 3, 1), vote(4, 1, 3)];
        let factors = RatingFactors {
            priority: 33,
            heat: 17,
            vote: 7,
        };

        let forward = tally_users(&questions, &votes, &factors);
        let mut rev_questions = questions.clone();
        rev_questions.reverse();
        let mut rev_votes = votes.clone();
        rev_votes.reverse();
        let backward = tally_users(&rev_questions, &rev_votes, &factors);

        assert_eq!(forward, backward);
    }

    #[test]
    fn test_clamp_grade() {
        assert_eq!(clamp_grade(5.0, 0.0), None);
        assert_eq!(clamp_grade(-1.0, 10.0), Some(0.0));
        assert_eq!(clamp_grade(12.5, 10.0), Some(10.0));
        assert_eq!(clamp_grade(7.25, 10.0), Some(7.25));
    }
}
