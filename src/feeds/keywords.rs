//! Domain vocabulary used to pick investment-related trends out of the
//! general trend list.

/// Built-in finance and investment vocabulary, grouped loosely by topic.
pub const INVESTMENT_KEYWORDS: &[&str] = &[
    // stocks and markets
    "株", "株価", "日経", "TOPIX", "マザーズ", "グロース", "東証",
    "株式", "銘柄", "相場", "暴落", "急騰", "上場", "IPO", "ストップ高",
    "ストップ安", "売買代金", "出来高", "PER", "PBR", "ROE",
    // investing in general
    "投資", "投資家", "資産運用", "ポートフォリオ", "配当", "利回り",
    "投資信託", "NISA", "iDeCo", "積立", "分散投資", "リスク管理",
    "インデックス", "アクティブ", "投信",
    // crypto
    "ビットコイン", "BTC", "イーサリアム", "ETH", "仮想通貨", "暗号資産",
    "リップル", "XRP", "crypto", "アルトコイン", "NFT", "web3",
    "ブロックチェーン", "DeFi", "DAO", "メタバース", "ステーブルコイン",
    "マイニング", "ウォレット", "取引所",
    // FX
    "FX", "為替", "ドル円", "ユーロ", "円安", "円高", "外貨", "通貨",
    "スワップ", "レバレッジ", "スプレッド", "pips",
    // macro indicators
    "金利", "利上げ", "利下げ", "GDP", "CPI", "インフレ", "デフレ",
    "雇用統計", "日銀", "FRB", "Fed", "FOMC", "金融政策", "量的緩和",
    "テーパリング", "YCC", "政策金利", "消費者物価", "景気",
    // corporate
    "決算", "業績", "四半期", "営業利益", "純利益", "売上高", "EPS",
    "M&A", "合併", "買収", "IR", "株主総会", "増配", "減配", "自社株買い",
    "増資", "株式分割", "企業価値",
    // other instruments
    "債券", "国債", "社債", "金", "ゴールド", "原油", "商品先物",
    "不動産", "REIT", "ファンド", "ヘッジファンド", "ETF", "インフレ連動債",
    // market events
    "配当落ち", "権利確定", "SQ", "MSCI", "オプション", "先物",
    // people
    "バフェット", "ソロス", "個人投資家", "機関投資家", "アナリスト",
    // misc
    "資産", "財テク", "節税", "確定申告", "損益通算", "ロスカット",
    "ナンピン", "押し目買い", "利確", "損切り",
];

/// Returns true if any keyword, case-folded, occurs in the case-folded label.
pub fn matches<K: AsRef<str>>(label: &str, keywords: &[K]) -> bool {
    let label = label.to_lowercase();
    keywords
        .iter()
        .any(|keyword| label.contains(&keyword.as_ref().to_lowercase()))
}

/// Ordered, immutable keyword list. Case folding is done once up front.
#[derive(Debug, Clone)]
pub struct KeywordSet {
    keywords: Vec<String>,
    folded: Vec<String>,
}

impl KeywordSet {
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let keywords: Vec<String> = keywords.into_iter().map(Into::into).collect();
        let folded = keywords.iter().map(|k| k.to_lowercase()).collect();
        Self { keywords, folded }
    }

    pub fn investment() -> Self {
        Self::new(INVESTMENT_KEYWORDS.iter().copied())
    }

    pub fn matches(&self, label: &str) -> bool {
        let label = label.to_lowercase();
        self.folded.iter().any(|keyword| label.contains(keyword.as_str()))
    }

    /// First keyword that hits, in list order.
    pub fn first_match(&self, label: &str) -> Option<&str> {
        let label = label.to_lowercase();
        self.folded
            .iter()
            .position(|keyword| label.contains(keyword.as_str()))
            .map(|idx| self.keywords[idx].as_str())
    }

    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.keywords.iter().map(String::as_str)
    }
}

impl Default for KeywordSet {
    fn default() -> Self {
        Self::investment()
    }
}
