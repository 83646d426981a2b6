/*!

This is the long-form manual for `election_setup` and `astris-setup`.

## The stages of a setup

An election is configured in six stages. They are always checked in this order,
and a stage only counts as complete if all the stages before it are complete too.

| # | Stage        | Key          | Complete when                                                        |
|---|--------------|--------------|----------------------------------------------------------------------|
| 1 | Info         | `basic`      | the election has a name and encryption parameters                    |
| 2 | Timing       | `timing`     | the time zone is known and the four phases are in order              |
| 3 | Candidates   | `candidates` | at least 2 candidates, each with a name                              |
| 4 | Trustees     | `trustees`   | at least 3 trustees, each with a name                                |
| 5 | Registrar    | `registrar`  | the registrar has a name and an `http(s)` registration URL           |
| 6 | Genesis      | `genesis`    | all the stages above are complete: the election can be published     |

The first stage that is not complete is the *active* stage. A setup interface
shows it by default, until the user picks another tab.

## Timing

All the times of an election are civil times (`2025-03-01T09:00:00`, no offset),
read in the time zone of the election (an IANA name such as `Europe/London`).
The four phases follow each other:

1. trustee confirmation of the parameters (`parameterConfirmation`)
2. voter registration (`voterRegistration`)
3. vote casting (`voteCasting`)
4. trustee tallying (`tallyDecryption`)

Each phase must close no earlier than it opens, and must open no earlier than
the previous phase closes. Two consecutive phases may share a boundary.

## Trustees

The keys, proofs and signatures of the trustees are verified by a remote
service. While the setup is in progress, a trustee with a name and no keys
yet is accepted.

## Candidate names

By default a candidate with a blank name keeps the candidates stage
incomplete. Earlier setup interfaces did not check the names at all; this
behaviour is available with [crate::NameCheck::Lenient].

*/
