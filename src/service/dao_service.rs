use ethers::types::Address;
use futures::future::join_all;
use serde::Serialize;
use tracing::info;

use super::query_service::QueryService;
use crate::address_book::{AddressResolver, NetworkAddresses};
use crate::models::{DaoInfo, DaoSummary, Query};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkView {
    pub network: String,
    #[serde(flatten)]
    pub addresses: NetworkAddresses,
}

/// DAO lookups scoped to the active network's address book entry
#[derive(Clone)]
pub struct DaoService {
    queries: QueryService,
    resolver: AddressResolver,
}

impl DaoService {
    pub fn new(queries: QueryService, resolver: AddressResolver) -> Self {
        Self { queries, resolver }
    }

    pub fn network(&self) -> NetworkView {
        NetworkView {
            network: self.resolver.network().to_string(),
            addresses: self.resolver.addresses().clone(),
        }
    }

    /// Known DAOs, each with its own info read
    pub async fn list(&self) -> Vec<DaoSummary> {
        let addresses = self.resolver.dao_list_addresses();
        let infos = join_all(
            addresses
                .iter()
                .map(|address| self.queries.dao_info(Some(*address))),
        )
        .await;

        info!(
            network = self.resolver.network(),
            daos = addresses.len(),
            ready = infos.iter().filter(|q| q.is_ready()).count(),
            "Listed DAOs"
        );

        addresses
            .iter()
            .zip(infos)
            .map(|(address, info)| DaoSummary {
                address: *address,
                info,
            })
            .collect()
    }

    pub async fn info(&self, address: Address) -> Query<DaoInfo> {
        self.queries.dao_info(Some(address)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address_book::AddressBook;
    use crate::chain::mock::MockChain;
    use crate::testing::{governor_address, mock_dao};
    use std::sync::Arc;

    fn resolver() -> AddressResolver {
        let book = AddressBook::from_json(&format!(
            r#"{{
                "localhost": {{
                    "note": "0x0000000000000000000000000000000000000001",
                    "daoFactory": "0x0000000000000000000000000000000000000002",
                    "daoList": ["{:?}", "0x0000000000000000000000000000000000000bad"]
                }}
            }}"#,
            governor_address()
        ))
        .unwrap();
        AddressResolver::new(&book, None).unwrap()
    }

    #[tokio::test]
    async fn test_list_reads_every_known_dao() {
        let chain = Arc::new(MockChain::new(1));
        mock_dao(&chain);

        let service = DaoService::new(QueryService::new(chain), resolver());
        let daos = service.list().await;

        assert_eq!(daos.len(), 2);
        assert_eq!(daos[0].address, governor_address());
        assert!(daos[0].info.is_ready());
        assert_eq!(daos[0].info.data().unwrap().name, "Grants DAO");

        // unknown contract reverts, listing keeps going
        assert_eq!(daos[1].address, Address::from_low_u64_be(0xbad));
        assert!(daos[1].info.error.is_some());
    }

    #[test]
    fn test_network_view() {
        let service = DaoService::new(QueryService::new(Arc::new(MockChain::new(1))), resolver());
        let view = service.network();
        assert_eq!(view.network, "localhost");
        assert_eq!(view.addresses.dao_list.len(), 2);

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["network"], "localhost");
        assert!(json["daoFactory"].is_string());
    }
}
