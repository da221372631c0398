//! In-memory stand-in for P6 used by the router tests.

use async_trait::async_trait;
use std::sync::Mutex;
use std::time::Duration;

use crate::p6::{ListQuery, ObsNode, P6Api, P6Credentials, P6Error, P6Session, ProjectRecord};

pub const FAKE_SESSION: &str = "fake-jsessionid";

#[derive(Clone, Copy)]
pub enum FakeFailure {
    Status(u16),
    Timeout,
    Unreachable,
}

#[derive(Default)]
pub struct FakeP6 {
    pub obs: Vec<ObsNode>,
    pub projects: Vec<ProjectRecord>,
    pub failure: Option<FakeFailure>,
    pub calls: Mutex<Vec<FakeCall>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FakeCall {
    Login(String),
    FindObs(P6Session, ListQuery),
    ListProjects(P6Session, ListQuery),
}

impl FakeP6 {
    pub fn failing(failure: FakeFailure) -> Self {
        FakeP6 {
            failure: Some(failure),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<FakeCall> {
        self.calls.lock().unwrap().clone()
    }

    fn check(&self) -> Result<(), P6Error> {
        match self.failure {
            None => Ok(()),
            Some(FakeFailure::Status(status)) => Err(P6Error::Status {
                status,
                body: format!("fake failure {}", status),
            }),
            Some(FakeFailure::Timeout) => Err(P6Error::Timeout(Duration::from_secs(10))),
            Some(FakeFailure::Unreachable) => {
                Err(P6Error::Transport("connection refused".to_string()))
            }
        }
    }
}

#[async_trait]
impl P6Api for FakeP6 {
    async fn login(&self, credentials: &P6Credentials) -> Result<P6Session, P6Error> {
        self.calls
            .lock()
            .unwrap()
            .push(FakeCall::Login(credentials.username.clone()));
        self.check()?;
        Ok(P6Session(FAKE_SESSION.to_string()))
    }

    async fn find_obs(
        &self,
        session: &P6Session,
        query: &ListQuery,
    ) -> Result<Vec<ObsNode>, P6Error> {
        self.calls
            .lock()
            .unwrap()
            .push(FakeCall::FindObs(session.clone(), query.clone()));
        self.check()?;
        Ok(self.obs.clone())
    }

    async fn list_projects(
        &self,
        session: &P6Session,
        query: &ListQuery,
    ) -> Result<Vec<ProjectRecord>, P6Error> {
        self.calls
            .lock()
            .unwrap()
            .push(FakeCall::ListProjects(session.clone(), query.clone()));
        self.check()?;
        Ok(self.projects.clone())
    }
}
