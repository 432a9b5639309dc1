use once_cell::sync::Lazy;
use regex::Regex;

use super::EndpointResolver;

/// A group of regions sharing one DNS suffix.
#[derive(Debug, Clone, Copy)]
pub struct Partition {
    pub id: &'static str,
    pub dns_suffix: &'static str,
    /// Matches region names that belong here even if not listed yet.
    pub region_pattern: &'static str,
    /// Regions where ECR is offered.
    pub ecr_regions: &'static [&'static str],
}

pub const PARTITIONS: &[Partition] = &[
    Partition {
        id: "aws",
        dns_suffix: "amazonaws.com",
        region_pattern: r"^(us|eu|ap|sa|ca|me|af|il|mx)\-\w+\-\d+$",
        ecr_regions: &[
            "af-south-1",
            "ap-east-1",
            "ap-northeast-1",
            "ap-northeast-2",
            "ap-northeast-3",
            "ap-south-1",
            "ap-south-2",
            "ap-southeast-1",
            "ap-southeast-2",
            "ap-southeast-3",
            "ap-southeast-4",
            "ap-southeast-5",
            "ca-central-1",
            "ca-west-1",
            "eu-central-1",
            "eu-central-2",
            "eu-north-1",
            "eu-south-1",
            "eu-south-2",
            "eu-west-1",
            "eu-west-2",
            "eu-west-3",
            "il-central-1",
            "me-central-1",
            "me-south-1",
            "sa-east-1",
            "us-east-1",
            "us-east-2",
            "us-west-1",
            "us-west-2",
        ],
    },
    Partition {
        id: "aws-cn",
        dns_suffix: "amazonaws.com.cn",
        region_pattern: r"^cn\-\w+\-\d+$",
        ecr_regions: &["cn-north-1", "cn-northwest-1"],
    },
    Partition {
        id: "aws-us-gov",
        dns_suffix: "amazonaws.com",
        region_pattern: r"^us\-gov\-\w+\-\d+$",
        ecr_regions: &["us-gov-east-1", "us-gov-west-1"],
    },
];

/// Compiled `region_pattern`s, index-aligned with [`PARTITIONS`].
static REGION_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    PARTITIONS
        .iter()
        .map(|p| Regex::new(p.region_pattern).expect("partition region pattern"))
        .collect()
});

/// Find the partition a region belongs to: listed regions first, then the name pattern.
pub fn partition_for_region(region: &str) -> Option<&'static Partition> {
    PARTITIONS
        .iter()
        .find(|p| p.ecr_regions.iter().any(|r| *r == region))
        .or_else(|| {
            PARTITIONS
                .iter()
                .zip(REGION_PATTERNS.iter())
                .find(|(_, re)| re.is_match(region))
                .map(|(p, _)| p)
        })
}

/// ECR registry hostnames from the built-in partition table.
#[derive(Debug, Default, Clone, Copy)]
pub struct EcrEndpoints;

impl EndpointResolver for EcrEndpoints {
    fn resolve_endpoints(&self, region: &str, account: &str) -> Vec<String> {
        let Some(partition) = partition_for_region(region) else {
            return Vec::new();
        };
        partition
            .ecr_regions
            .iter()
            .map(|r| format!("{account}.dkr.ecr.{r}.{}", partition.dns_suffix))
            .collect()
    }
}
