//! # 패싯 한도와 패싯 값 페이지네이터
//!
//! 패싯 목록에는 "한도 N / 무제한 / 미설정"의 세 상태가 있습니다.
//! Solr는 무제한을 `facet.limit=-1`로 표현하는데, 숫자 센티널을 코드에
//! 퍼뜨리는 대신 `FacetLimit` 열거형으로 상태를 명시합니다.
//!
//! `FacetPaginator`는 +1 탐침(한도보다 하나 더 요청해서 다음 페이지 존재
//! 여부를 추가 왕복 없이 판단하는 기법)의 결과를 받아, 화면에 보여줄
//! 페이지 분량과 이전/다음 가능 여부를 계산합니다.

use crate::config::{FacetLimitConfig, SearchConfig};
use crate::solr::response::{FacetItem, SolrResponse};
use serde::{Deserialize, Serialize, Serializer};

/// 패싯 값 페이지네이션에 쓰는 앱 수준 요청 키
pub const FACET_OFFSET_KEY: &str = "facet.offset";
pub const FACET_SORT_KEY: &str = "facet.sort";

/// 패싯 목록 한도 재정의가 없을 때의 기본값
pub const DEFAULT_FACET_LIST_LIMIT: u32 = 20;

/// 패싯 한도의 세 가지 상태
///
/// JSON 직렬화: `Bounded(10)` → `10`, `Unlimited` → `"unlimited"`, `Unset` → `null`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FacetLimit {
    /// 한 페이지에 N개까지
    Bounded(u32),
    /// 한도 없음 (Solr의 `facet.limit=-1`)
    Unlimited,
    /// 아무 설정도 없음
    Unset,
}

impl FacetLimit {
    /// 유한 한도면 그 값을 돌려줍니다.
    pub fn bound(&self) -> Option<u32> {
        match self {
            FacetLimit::Bounded(n) => Some(*n),
            _ => None,
        }
    }

    /// 메아리친 `facet.limit` 값에서 실제 한도를 복원합니다.
    ///
    /// 우리가 보낸 값은 "+1 탐침"이 더해진 것이므로 1을 되돌립니다.
    /// `-1`은 Solr의 무제한 표기입니다.
    pub fn from_echoed(echoed: i64) -> FacetLimit {
        match echoed {
            -1 => FacetLimit::Unlimited,
            n if n > 0 => FacetLimit::Bounded((n - 1) as u32),
            _ => FacetLimit::Unset,
        }
    }
}

impl Serialize for FacetLimit {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FacetLimit::Bounded(n) => serializer.serialize_u32(*n),
            FacetLimit::Unlimited => serializer.serialize_str("unlimited"),
            FacetLimit::Unset => serializer.serialize_none(),
        }
    }
}

/// 패싯 값 목록의 정렬 방식
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FacetSort {
    /// 건수 내림차순 (Solr 기본, 한도가 있을 때)
    Count,
    /// 값의 사전순 (한도가 없을 때의 Solr 기본)
    Index,
}

impl FacetSort {
    pub fn parse(value: &str) -> Option<FacetSort> {
        match value {
            "count" => Some(FacetSort::Count),
            "index" => Some(FacetSort::Index),
            _ => None,
        }
    }
}

/// 설정과 (있다면) 응답을 바탕으로 패싯 필드의 한도를 결정합니다.
///
/// - `Bounded(n)` 설정 → 그대로
/// - `FromResponse` 설정 → 응답에 메아리친 per-field 한도, 없으면 전역
///   `facet.limit`에서 복원. 응답이 없으면 `Unset`
/// - 설정 없음 → `Unset`
pub fn facet_limit_for(
    config: &SearchConfig,
    field: &str,
    response: Option<&SolrResponse>,
) -> FacetLimit {
    match config.facet_limit(field) {
        None => FacetLimit::Unset,
        Some(FacetLimitConfig::Bounded(n)) => FacetLimit::Bounded(n),
        Some(FacetLimitConfig::FromResponse(_)) => {
            let Some(response) = response else {
                return FacetLimit::Unset;
            };
            let echoed = response
                .echoed_i64(&format!("f.{field}.facet.limit"))
                .or_else(|| response.echoed_i64("facet.limit"));
            match echoed {
                Some(n) => FacetLimit::from_echoed(n),
                None => FacetLimit::Unset,
            }
        }
    }
}

/// 한 패싯 필드의 값 목록 한 페이지
///
/// `items`는 이미 한도만큼 잘려 있고, +1 탐침으로 넘어온 초과분은
/// `has_next` 판정에만 쓰인 뒤 버려집니다.
#[derive(Debug, Clone, Serialize)]
pub struct FacetPaginator {
    pub items: Vec<FacetItem>,
    pub offset: u64,
    pub limit: FacetLimit,
    pub sort: FacetSort,
    pub has_next: bool,
    pub has_previous: bool,
}

impl FacetPaginator {
    /// Solr가 돌려준 값 목록(+1 탐침 포함 가능)으로 페이지를 만듭니다.
    pub fn new(all_items: Vec<FacetItem>, offset: u64, limit: FacetLimit, sort: FacetSort) -> Self {
        let (items, has_next) = match limit.bound() {
            Some(n) => {
                let n = n as usize;
                let has_next = all_items.len() > n;
                let mut items = all_items;
                items.truncate(n);
                (items, has_next)
            }
            // 무제한/미설정이면 전부 한 페이지입니다
            None => (all_items, false),
        };

        Self {
            items,
            offset,
            limit,
            sort,
            has_next,
            has_previous: offset > 0,
        }
    }

    /// 다음 페이지의 오프셋 (다음 페이지가 있을 때만)
    pub fn next_offset(&self) -> Option<u64> {
        let limit = u64::from(self.limit.bound()?);
        self.has_next.then(|| self.offset + limit)
    }

    /// 이전 페이지의 오프셋 (이전 페이지가 있을 때만)
    pub fn previous_offset(&self) -> Option<u64> {
        if !self.has_previous {
            return None;
        }
        let limit = u64::from(self.limit.bound().unwrap_or(0));
        Some(self.offset.saturating_sub(limit))
    }
}
