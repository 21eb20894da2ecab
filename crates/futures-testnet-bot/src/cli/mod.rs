/*
[INPUT]:  Resolved configuration and terminal input
[OUTPUT]: Interactive front-ends for the binary
[POS]:    CLI module root
[UPDATE]: When adding interactive flows
*/

pub mod dashboard;
