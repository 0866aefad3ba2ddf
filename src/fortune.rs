use ::rand::Rng;
use serde::Serialize;

/// Tier of a drawn fortune, best first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum FortuneLevel {
    GreatLuck,
    Luck,
    MiddleLuck,
    SmallLuck,
    Bad,
    GreatBad,
}

impl FortuneLevel {
    pub fn label(self) -> &'static str {
        match self {
            Self::GreatLuck => "大吉",
            Self::Luck => "吉",
            Self::MiddleLuck => "中吉",
            Self::SmallLuck => "小吉",
            Self::Bad => "凶",
            Self::GreatBad => "大凶",
        }
    }

    pub fn category(self) -> Category {
        match self {
            Self::Bad | Self::GreatBad => Category::Bad,
            _ => Category::Good,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Good,
    Bad,
}

/// Display tint for card text and backgrounds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Tint {
    Red600,
    Red500,
    Red100,
    Red50,
    Orange500,
    Orange50,
    Yellow600,
    Yellow50,
    Gray800,
    Gray600,
    Gray300,
    Gray200,
}

impl Tint {
    pub fn rgb(self) -> [u8; 3] {
        match self {
            Self::Red600 => [220, 38, 38],
            Self::Red500 => [239, 68, 68],
            Self::Red100 => [254, 226, 226],
            Self::Red50 => [254, 242, 242],
            Self::Orange500 => [249, 115, 22],
            Self::Orange50 => [255, 247, 237],
            Self::Yellow600 => [202, 138, 4],
            Self::Yellow50 => [254, 252, 232],
            Self::Gray800 => [31, 41, 55],
            Self::Gray600 => [75, 85, 99],
            Self::Gray300 => [209, 213, 219],
            Self::Gray200 => [229, 231, 235],
        }
    }
}

/// One possible draw outcome. Immutable once built.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Fortune {
    pub level: FortuneLevel,
    pub category: Category,
    pub color: Tint,
    pub background: Tint,
    pub description: &'static str,
    pub poem: &'static str,
}

impl Fortune {
    /// Build a fortune whose category, tints and description follow its tier.
    pub const fn of_level(level: FortuneLevel, poem: &'static str) -> Self {
        let (category, color, background, description) = match level {
            FortuneLevel::GreatLuck => (Category::Good, Tint::Red600, Tint::Red100, "万事如意，心想事成"),
            FortuneLevel::Luck => (Category::Good, Tint::Red500, Tint::Red50, "顺风顺水，吉星高照"),
            FortuneLevel::MiddleLuck => {
                (Category::Good, Tint::Orange500, Tint::Orange50, "平稳上升，虽有波折无碍")
            }
            FortuneLevel::SmallLuck => {
                (Category::Good, Tint::Yellow600, Tint::Yellow50, "微小确幸，宜稳扎稳打")
            }
            FortuneLevel::Bad => (Category::Bad, Tint::Gray600, Tint::Gray200, "诸事小心，宜守不宜进"),
            FortuneLevel::GreatBad => {
                (Category::Bad, Tint::Gray800, Tint::Gray300, "退一步海阔天空，切勿强求")
            }
        };
        Self {
            level,
            category,
            color,
            background,
            description,
            poem,
        }
    }

    pub fn is_good(&self) -> bool {
        self.category == Category::Good
    }
}

pub const CORPUS_LEN: usize = 8;

pub static STANDARD_CORPUS: [Fortune; CORPUS_LEN] = [
    Fortune::of_level(FortuneLevel::GreatLuck, "长风破浪会有时，直挂云帆济沧海。"),
    Fortune::of_level(FortuneLevel::GreatLuck, "好雨知时节，当春乃发生。"),
    Fortune::of_level(FortuneLevel::Luck, "山重水复疑无路，柳暗花明又一村。"),
    Fortune::of_level(FortuneLevel::Luck, "欲穷千里目，更上一层楼。"),
    Fortune::of_level(FortuneLevel::MiddleLuck, "采菊东篱下，悠然见南山。"),
    Fortune::of_level(FortuneLevel::SmallLuck, "小荷才露尖尖角，早有蜻蜓立上头。"),
    Fortune::of_level(FortuneLevel::Bad, "黑云压城城欲摧，甲光向日金鳞开。（需谨慎）"),
    Fortune::of_level(FortuneLevel::GreatBad, "风急天高猿啸哀，渚清沙白鸟飞回。（宜静养）"),
];

/// Read-only, non-empty list of fortunes to draw from.
#[derive(Clone, Debug)]
pub struct FortuneCorpus {
    entries: Vec<Fortune>,
}

impl FortuneCorpus {
    pub fn new(entries: Vec<Fortune>) -> Result<Self, String> {
        if entries.is_empty() {
            return Err("fortune corpus must not be empty".to_string());
        }
        Ok(Self { entries })
    }

    pub fn standard() -> Self {
        Self {
            entries: STANDARD_CORPUS.to_vec(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn get(&self, index: usize) -> Option<&Fortune> {
        self.entries.get(index)
    }

    /// Uniform draw with replacement. Returns the index alongside the fortune.
    pub fn draw(&self, rng: &mut impl Rng) -> (usize, Fortune) {
        let index = rng.gen_range(0..self.entries.len());
        (index, self.entries[index])
    }
}
